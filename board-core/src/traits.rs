//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Strip, Netzwerk und Timer
//! ohne konkrete Implementierung.

use core::future::Future;

use rgb::RGB8;

use crate::http::{HttpError, HttpUrl, Response};

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    WriteFailed,
}

/// Trait für den LED-Strip (WS2812/Neopixel)
///
/// Ein Aufruf überträgt den kompletten Pixel-Buffer ("show").
/// Die globale Helligkeit wird beim Schreiben auf alle Pixel angewendet.
///
/// # Implementierungen
/// - **Production:** RmtStripWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockStripWriter (in-memory Mock)
pub trait StripWriter {
    /// Schreibt alle Pixel mit der angegebenen Helligkeit (0-255)
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, pixels: &[RGB8], brightness: u8) -> Result<(), LedError>;
}

/// HTTP-Client für die beiden Server-Endpunkte
///
/// Jeder Aufruf baut eine eigene Verbindung auf, sendet `POST` mit leerem
/// Body und schließt die Verbindung nach dem Lesen der Antwort wieder.
/// Die Antwort wird in `buf` abgelegt, `Response::body` zeigt dort hinein.
pub trait HttpClient {
    fn post<'b>(
        &mut self,
        url: &HttpUrl<'_>,
        buf: &'b mut [u8],
    ) -> impl Future<Output = Result<Response<'b>, HttpError>>;
}

/// Wartezeit zwischen zwei Frames
pub trait FrameTimer {
    fn wait_ms(&mut self, ms: u64) -> impl Future<Output = ()>;
}
