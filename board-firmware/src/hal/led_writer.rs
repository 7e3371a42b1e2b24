// StripWriter Implementierung für echte Hardware
//
// Schreibt den kompletten Strip über das RMT Peripheral.
// Der Trait selbst liegt in board-core, Mocks in board-tests.

use board_core::{LED_COUNT, LedError, StripWriter};
use esp_hal::Blocking;
use esp_hal::gpio::interconnect::PeripheralOutput;
use esp_hal::rmt::{PulseCode, Rmt};
use esp_hal::time::Rate;
use esp_hal_smartled::{SmartLedsAdapter, buffer_size};
use rgb::RGB8;
use smart_leds::brightness;
use smart_leds_trait::SmartLedsWrite;

/// RMT-Buffer: 24 Pulse pro LED (3 Farben * 8 Bits) + 1 Reset
pub const RMT_BUFFER_SIZE: usize = buffer_size(LED_COUNT);

/// Fehler beim Initialisieren des RMT Peripherals
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct RmtInitError;

/// Real Hardware Strip Writer
///
/// Nutzt ESP32 RMT Channel 0 um WS2812 LEDs anzusteuern.
///
/// Hinweis: Der Buffer muss so lange leben wie der Writer, daher wird er
/// im Task erstellt und als Parameter übergeben statt im Constructor allokiert.
pub struct RmtStripWriter<'a> {
    led: SmartLedsAdapter<'a, RMT_BUFFER_SIZE>,
}

impl<'a> RmtStripWriter<'a> {
    /// Erstellt einen neuen RmtStripWriter
    ///
    /// # Parameter
    /// - `pin`: GPIO für die Datenleitung
    /// - `rmt_peripheral`: RMT Peripheral
    /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
    /// - `buffer`: Buffer für LED-Daten (erstellt mit `smart_led_buffer!(LED_COUNT)`)
    pub fn new(
        pin: impl PeripheralOutput<'a>,
        rmt_peripheral: esp_hal::peripherals::RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut [PulseCode; RMT_BUFFER_SIZE],
    ) -> Result<Self, RmtInitError> {
        let rmt: Rmt<'a, Blocking> =
            Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz)).map_err(|_| RmtInitError)?;

        let led = SmartLedsAdapter::new(rmt.channel0, pin, buffer);

        Ok(Self { led })
    }
}

impl StripWriter for RmtStripWriter<'_> {
    fn write(&mut self, pixels: &[RGB8], level: u8) -> Result<(), LedError> {
        // Skalierung erst beim Senden, der Frame-Buffer bleibt unverändert
        self.led
            .write(brightness(pixels.iter().copied(), level))
            .map_err(|_| LedError::WriteFailed)
    }
}
