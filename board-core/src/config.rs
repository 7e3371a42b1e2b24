//! Laufzeit-Konfiguration des Pollers
//!
//! Die Firmware baut die Werte beim Start aus ihren Build-Konstanten
//! zusammen, `validate()` prüft sie bevor irgendetwas gestartet wird.

use crate::http::{HttpUrl, UrlError};
use crate::schedule::DEFAULT_REFRESH_THRESHOLD;

/// Standard-Framerate (Frames pro Sekunde)
pub const DEFAULT_FRAME_RATE: u16 = 50;

/// Maximale SSID-Länge laut 802.11
pub const MAX_SSID_LEN: usize = 32;

/// WPA2-Passphrase: 8-63 Zeichen, leer = offenes Netz
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    EmptySsid,
    SsidTooLong,
    InvalidPassword,
    ZeroFrameRate,
    BoardUrl(UrlError),
    BrightnessUrl(UrlError),
    /// Server muss als IPv4-Adresse angegeben sein
    HostNotIpv4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig<'a> {
    /// SSID des eigenen Access Points
    pub ssid: &'a str,
    /// WPA2-Passphrase des Access Points
    pub password: &'a str,
    /// Endpunkt für den Board-Zustand
    pub board_url: &'a str,
    /// Endpunkt für die Helligkeit
    pub brightness_url: &'a str,
    pub frame_rate: u16,
    /// Schwelle für den Helligkeits-Refresh (Periode = Schwelle + 1)
    pub brightness_refresh_frames: u32,
}

/// Geprüfte Server-Endpunkte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints<'a> {
    pub board: HttpUrl<'a>,
    pub brightness: HttpUrl<'a>,
}

impl<'a> PollerConfig<'a> {
    /// Konfiguration mit Standardwerten für Framerate und Refresh
    pub const fn new(
        ssid: &'a str,
        password: &'a str,
        board_url: &'a str,
        brightness_url: &'a str,
    ) -> Self {
        Self {
            ssid,
            password,
            board_url,
            brightness_url,
            frame_rate: DEFAULT_FRAME_RATE,
            brightness_refresh_frames: DEFAULT_REFRESH_THRESHOLD,
        }
    }

    pub const fn with_frame_rate(mut self, frame_rate: u16) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub const fn with_brightness_refresh_frames(mut self, frames: u32) -> Self {
        self.brightness_refresh_frames = frames;
        self
    }

    /// Wartezeit nach einem gerenderten Frame (`1000 / frame_rate`)
    pub fn frame_delay_ms(&self) -> u64 {
        match self.frame_rate {
            0 => 0,
            rate => 1000 / u64::from(rate),
        }
    }

    /// Ist das WLAN offen (kein Passwort)?
    pub fn is_open_network(&self) -> bool {
        self.password.is_empty()
    }

    /// Prüft alle Felder und liefert die geparsten Endpunkte
    pub fn validate(&self) -> Result<Endpoints<'a>, ConfigError> {
        if self.ssid.is_empty() {
            return Err(ConfigError::EmptySsid);
        }
        if self.ssid.len() > MAX_SSID_LEN {
            return Err(ConfigError::SsidTooLong);
        }
        if !self.password.is_empty()
            && !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&self.password.len())
        {
            return Err(ConfigError::InvalidPassword);
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }

        let board = HttpUrl::parse(self.board_url).map_err(ConfigError::BoardUrl)?;
        let brightness = HttpUrl::parse(self.brightness_url).map_err(ConfigError::BrightnessUrl)?;
        if board.ipv4().is_none() || brightness.ipv4().is_none() {
            return Err(ConfigError::HostNotIpv4);
        }

        Ok(Endpoints { board, brightness })
    }
}
