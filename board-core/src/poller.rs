//! Board Poller - Testbare Loop-Logik ohne Hardware-Abhängigkeit
//!
//! Ein Durchlauf (`run_cycle`):
//! 1. `POST` an den Board-Endpunkt, bei 200 Frame rendern, flushen und
//!    `1000 / frame_rate` ms warten
//! 2. Zähler weiterzählen
//! 3. Bei Überschreiten der Schwelle einmal die Helligkeit holen
//!
//! Fehler (Status != 200, Netzwerk, kaputtes JSON) lassen Pixel und
//! Helligkeit unverändert und werden nur geloggt. Kein Retry, kein Backoff.

use crate::LED_COUNT;
use crate::config::{ConfigError, Endpoints, PollerConfig};
use crate::frame::{Frame, MAX_BRIGHTNESS};
use crate::http::HttpError;
use crate::protocol::{self, ProtocolError};
use crate::schedule::{PollMode, PollSchedule};
use crate::traits::{FrameTimer, HttpClient, LedError, StripWriter};

/// Ergebnis einer Anfrage an einen der beiden Endpunkte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// Antwort übernommen und auf den Strip geschrieben
    Applied,
    /// Server hat mit einem anderen Status als 200 geantwortet
    Rejected(u16),
    /// Verbindung oder HTTP-Antwort fehlerhaft
    Transport(HttpError),
    /// Status 200, aber JSON unbrauchbar
    Malformed(ProtocolError),
    /// Buffer aktualisiert, Schreiben auf den Strip fehlgeschlagen
    WriteFailed(LedError),
}

impl PollOutcome {
    /// Wurde ein neuer Zustand in den Buffer übernommen?
    fn updated_state(&self) -> bool {
        matches!(self, PollOutcome::Applied | PollOutcome::WriteFailed(_))
    }
}

/// Zusammenfassung eines Loop-Durchlaufs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub board: PollOutcome,
    /// Nur gesetzt wenn in diesem Durchlauf der Refresh fällig war
    pub brightness: Option<PollOutcome>,
    /// Gewartete Zeit nach dem Rendern
    pub frame_delay_ms: Option<u64>,
}

/// Besitzt Frame, Strip, Zähler und Endpunkte
///
/// Der generische Parameter `W: StripWriter` ermöglicht:
/// - Real Hardware (RmtStripWriter) im Production-Code
/// - Mock Implementation (MockStripWriter) in Tests
pub struct BoardPoller<'a, W> {
    endpoints: Endpoints<'a>,
    frame: Frame,
    writer: W,
    schedule: PollSchedule,
    frame_delay_ms: u64,
}

impl<'a, W: StripWriter> BoardPoller<'a, W> {
    /// Prüft die Konfiguration und erstellt den Poller
    pub fn new(config: &PollerConfig<'a>, writer: W) -> Result<Self, ConfigError> {
        let endpoints = config.validate()?;

        Ok(Self {
            endpoints,
            frame: Frame::new(),
            writer,
            schedule: PollSchedule::new(config.brightness_refresh_frames),
            frame_delay_ms: config.frame_delay_ms(),
        })
    }

    /// Strip beim Booten ausschalten, Helligkeit auf Maximum
    pub fn start(&mut self) -> Result<(), LedError> {
        self.frame.clear();
        self.frame.set_brightness(MAX_BRIGHTNESS);
        self.frame.flush(&mut self.writer)
    }

    /// Ein kompletter Loop-Durchlauf
    pub async fn run_cycle<C: HttpClient, T: FrameTimer>(
        &mut self,
        client: &mut C,
        timer: &mut T,
        buf: &mut [u8],
    ) -> CycleReport {
        let board = self.poll_board(client, buf).await;

        let frame_delay_ms = if board.updated_state() {
            timer.wait_ms(self.frame_delay_ms).await;
            Some(self.frame_delay_ms)
        } else {
            None
        };

        let brightness = match self.schedule.tick() {
            PollMode::PollingBoard => None,
            PollMode::RefreshingBrightness => Some(self.refresh_brightness(client, buf).await),
        };

        CycleReport {
            board,
            brightness,
            frame_delay_ms,
        }
    }

    /// Holt den Board-Zustand und rendert ihn
    pub async fn poll_board<C: HttpClient>(&mut self, client: &mut C, buf: &mut [u8]) -> PollOutcome {
        let url = self.endpoints.board;

        let response = match client.post(&url, buf).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Poller: Board request failed: {}", e);
                return PollOutcome::Transport(e);
            }
        };

        if !response.is_ok() {
            debug!("Poller: Board endpoint answered {}", response.status);
            return PollOutcome::Rejected(response.status);
        }

        let board = match protocol::parse_board(response.body) {
            Ok(board) => board,
            Err(e) => {
                warn!("Poller: Board response unusable: {}", e);
                return PollOutcome::Malformed(e);
            }
        };

        if board.len() < LED_COUNT {
            debug!(
                "Poller: Board has {} of {} entries, rest stays dark",
                board.len(),
                LED_COUNT
            );
        }
        if board.unknown() > 0 {
            debug!("Poller: {} entries without known color", board.unknown());
        }

        let lit = self.frame.render_board(&board);
        debug!("Poller: Rendered frame, {} pixels lit", lit);

        match self.frame.flush(&mut self.writer) {
            Ok(()) => PollOutcome::Applied,
            Err(e) => {
                error!("Poller: Failed to write to LED strip");
                PollOutcome::WriteFailed(e)
            }
        }
    }

    /// Holt die Helligkeit und wendet sie an
    pub async fn refresh_brightness<C: HttpClient>(
        &mut self,
        client: &mut C,
        buf: &mut [u8],
    ) -> PollOutcome {
        let url = self.endpoints.brightness;
        info!("Poller: Refreshing brightness");

        let response = match client.post(&url, buf).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Poller: Brightness request failed: {}", e);
                return PollOutcome::Transport(e);
            }
        };

        if !response.is_ok() {
            warn!("Poller: Brightness endpoint answered {}", response.status);
            return PollOutcome::Rejected(response.status);
        }

        let level = match protocol::parse_brightness(response.body) {
            Ok(level) => level,
            Err(e) => {
                warn!("Poller: Brightness response unusable: {}", e);
                return PollOutcome::Malformed(e);
            }
        };

        if level != self.frame.brightness() {
            info!(
                "Poller: Brightness {} -> {}",
                self.frame.brightness(),
                level
            );
        }
        self.frame.set_brightness(level);

        match self.frame.flush(&mut self.writer) {
            Ok(()) => PollOutcome::Applied,
            Err(e) => {
                error!("Poller: Failed to write to LED strip");
                PollOutcome::WriteFailed(e)
            }
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn schedule(&self) -> &PollSchedule {
        &self.schedule
    }

    pub fn endpoints(&self) -> &Endpoints<'a> {
        &self.endpoints
    }

    pub fn frame_delay_ms(&self) -> u64 {
        self.frame_delay_ms
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }
}
