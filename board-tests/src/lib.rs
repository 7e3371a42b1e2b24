//! Mocks für die Host-Tests
//!
//! Implementieren die Hardware-Traits aus board-core in-memory,
//! damit der Poller ohne ESP32 getestet werden kann.

use std::collections::{HashMap, VecDeque};

use board_core::http::parse_response;
use board_core::{FrameTimer, HttpClient, HttpError, HttpUrl, LedError, Response, StripWriter};
use rgb::RGB8;

// ============================================================================
// Mock Strip Writer
// ============================================================================

#[derive(Default)]
pub struct MockStripWriter {
    /// Zuletzt geschriebene Pixel (für Assertions in Tests)
    pub last_pixels: Option<Vec<RGB8>>,
    /// Zuletzt geschriebene Helligkeit
    pub last_brightness: Option<u8>,
    /// Anzahl der write() Aufrufe
    pub write_count: usize,
    /// Simuliere Fehler beim nächsten write()
    pub fail_next_write: bool,
}

impl MockStripWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StripWriter for MockStripWriter {
    fn write(&mut self, pixels: &[RGB8], brightness: u8) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_pixels = Some(pixels.to_vec());
        self.last_brightness = Some(brightness);
        self.write_count += 1;
        Ok(())
    }
}

// ============================================================================
// Mock HTTP Client
// ============================================================================

/// Vorbereitete Antwort des Mock-Servers
#[derive(Clone, Debug)]
pub enum Reply {
    /// Rohe HTTP-Antwort (Status-Zeile, Header, Body)
    Raw(Vec<u8>),
    /// Fehler auf Transport-Ebene
    Error(HttpError),
}

impl Reply {
    /// Antwort mit `Content-Length`
    pub fn json(status: u16, body: &str) -> Self {
        Reply::Raw(
            format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .into_bytes(),
        )
    }

    /// Antwort mit `Transfer-Encoding: chunked`, Body in Stücke zerlegt
    pub fn chunked(status: u16, body: &str, chunk_size: usize) -> Self {
        let mut raw =
            format!("HTTP/1.1 {} X\r\nTransfer-Encoding: chunked\r\n\r\n", status).into_bytes();
        for chunk in body.as_bytes().chunks(chunk_size) {
            raw.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
            raw.extend_from_slice(chunk);
            raw.extend_from_slice(b"\r\n");
        }
        raw.extend_from_slice(b"0\r\n\r\n");
        Reply::Raw(raw)
    }
}

/// Scriptbarer HTTP-Client
///
/// Pro Pfad eine Queue mit Antworten; ist sie leer, wird die
/// Default-Antwort des Pfads genutzt, ohne Default `HttpError::Connect`.
#[derive(Default)]
pub struct MockHttpClient {
    queued: HashMap<String, VecDeque<Reply>>,
    defaults: HashMap<String, Reply>,
    /// Angefragte Pfade in Reihenfolge
    pub requests: Vec<String>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: &str, reply: Reply) {
        self.queued
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn set_default(&mut self, path: &str, reply: Reply) {
        self.defaults.insert(path.to_string(), reply);
    }

    /// Anzahl Anfragen an einen Pfad
    pub fn count(&self, path: &str) -> usize {
        self.requests.iter().filter(|p| p.as_str() == path).count()
    }

    fn next_reply(&mut self, path: &str) -> Reply {
        self.queued
            .get_mut(path)
            .and_then(VecDeque::pop_front)
            .or_else(|| self.defaults.get(path).cloned())
            .unwrap_or(Reply::Error(HttpError::Connect))
    }
}

impl HttpClient for MockHttpClient {
    async fn post<'b>(
        &mut self,
        url: &HttpUrl<'_>,
        buf: &'b mut [u8],
    ) -> Result<Response<'b>, HttpError> {
        self.requests.push(url.path().to_string());

        match self.next_reply(url.path()) {
            Reply::Error(e) => Err(e),
            Reply::Raw(bytes) => {
                if bytes.len() > buf.len() {
                    return Err(HttpError::BufferFull);
                }
                buf[..bytes.len()].copy_from_slice(&bytes);
                parse_response(&mut buf[..bytes.len()])
            }
        }
    }
}

// ============================================================================
// Mock Frame Timer
// ============================================================================

#[derive(Default)]
pub struct MockFrameTimer {
    /// Alle angefragten Wartezeiten in ms
    pub waits: Vec<u64>,
}

impl MockFrameTimer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameTimer for MockFrameTimer {
    async fn wait_ms(&mut self, ms: u64) {
        self.waits.push(ms);
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Baut `{"boardInfo":{"board":[{"color":"..."}, ...]}}`
pub fn board_json(names: &[&str]) -> String {
    let cells: Vec<String> = names
        .iter()
        .map(|name| format!("{{\"color\":\"{}\"}}", name))
        .collect();
    format!("{{\"boardInfo\":{{\"board\":[{}]}}}}", cells.join(","))
}

/// Baut `{"brightness": n}`
pub fn brightness_json(level: i64) -> String {
    format!("{{\"brightness\":{}}}", level)
}
