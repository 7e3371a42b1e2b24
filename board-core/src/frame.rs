//! Pixel-Buffer und globale Helligkeit
//!
//! Der Frame gehört exklusiv dem Poller. Änderungen landen erst mit
//! `flush()` auf dem Strip.

use rgb::RGB8;

use crate::LED_COUNT;
use crate::protocol::BoardSnapshot;
use crate::traits::{LedError, StripWriter};

/// Maximale Helligkeit, gleichzeitig Startwert
pub const MAX_BRIGHTNESS: u8 = u8::MAX;

/// Begrenzt einen Helligkeitswert vom Server auf 0-255
///
/// ```
/// # use board_core::clamp_brightness;
/// assert_eq!(clamp_brightness(-5), 0);
/// assert_eq!(clamp_brightness(90), 90);
/// assert_eq!(clamp_brightness(1000), 255);
/// ```
pub fn clamp_brightness(raw: i64) -> u8 {
    raw.clamp(0, i64::from(MAX_BRIGHTNESS)) as u8
}

/// Aktueller Zustand des Strips
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: [RGB8; LED_COUNT],
    brightness: u8,
}

impl Frame {
    pub const fn new() -> Self {
        Self {
            pixels: [RGB8 { r: 0, g: 0, b: 0 }; LED_COUNT],
            brightness: MAX_BRIGHTNESS,
        }
    }

    /// Alle Pixel aus (Helligkeit bleibt)
    pub fn clear(&mut self) {
        self.pixels = [RGB8::default(); LED_COUNT];
    }

    /// Setzt ein Pixel, `false` wenn der Index außerhalb des Strips liegt
    pub fn set_pixel(&mut self, index: usize, color: RGB8) -> bool {
        match self.pixels.get_mut(index) {
            Some(pixel) => {
                *pixel = color;
                true
            }
            None => false,
        }
    }

    pub fn pixels(&self) -> &[RGB8; LED_COUNT] {
        &self.pixels
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    /// Überträgt einen Board-Snapshot in den Buffer
    ///
    /// Der Buffer wird vorher gelöscht. Einträge ohne bekannte Farbe und
    /// Pixel ohne Eintrag (kurze Liste) bleiben schwarz.
    /// Gibt die Anzahl gesetzter Pixel zurück.
    pub fn render_board(&mut self, board: &BoardSnapshot) -> usize {
        self.clear();

        let mut lit = 0;
        for (index, cell) in board.cells().iter().enumerate() {
            if let Some(color) = cell {
                if self.set_pixel(index, color.rgb()) {
                    lit += 1;
                }
            }
        }
        lit
    }

    /// Schreibt Buffer + Helligkeit auf den Strip ("show")
    pub fn flush<W: StripWriter>(&self, writer: &mut W) -> Result<(), LedError> {
        writer.write(&self.pixels, self.brightness)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}
