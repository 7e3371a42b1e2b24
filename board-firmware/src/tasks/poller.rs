// Board Poller Task - Holt Board und Helligkeit, schreibt den LED-Strip
use board_core::{BoardPoller, LED_COUNT, PollerConfig, StripWriter};
use defmt::{error, info};
use embassy_net::Stack;
use embassy_time::Duration;
use esp_hal_smartled::smart_led_buffer;

use crate::config::{HTTP_RESPONSE_BUFFER_SIZE, HTTP_TIMEOUT_SECS, LED_GPIO_PIN, RMT_CLOCK_MHZ};
use crate::hal::{EmbassyFrameTimer, RmtStripWriter, TcpHttpClient};
use crate::tasks::wifi::wait_for_link;

/// Poll Loop - Testbare Logik liegt in `BoardPoller::run_cycle`
///
/// Läuft endlos, jeder Durchlauf ist unabhängig vom Ergebnis des vorherigen.
pub async fn board_poller_loop<W: StripWriter>(
    mut poller: BoardPoller<'static, W>,
    stack: Stack<'static>,
) -> ! {
    let mut client = TcpHttpClient::new(stack, Duration::from_secs(HTTP_TIMEOUT_SECS));
    let mut timer = EmbassyFrameTimer;
    let mut response = [0u8; HTTP_RESPONSE_BUFFER_SIZE];

    wait_for_link(stack).await;
    info!(
        "Poller: Polling {} every {} ms",
        poller.endpoints().board.path(),
        poller.frame_delay_ms()
    );

    loop {
        poller.run_cycle(&mut client, &mut timer, &mut response).await;
    }
}

/// Board Poller Task - Embassy Task für parallele Ausführung
///
/// Dieser Task übernimmt die Hardware-Initialisierung und ruft dann
/// die Poll-Schleife auf.
///
/// # Parameter
/// - `led_pin`: GPIO für die Datenleitung des Strips
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `config`: Geprüfte Poller-Konfiguration
/// - `stack`: embassy-net Stack des Access Points
#[embassy_executor::task]
pub async fn board_poller_task(
    led_pin: esp_hal::peripherals::GPIO4<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    config: PollerConfig<'static>,
    stack: Stack<'static>,
) {
    // Buffer für SmartLED Daten erstellen (ganzer Strip)
    // Macro allokiert Speicher im richtigen Format für RMT
    let mut rmt_buffer = smart_led_buffer!(LED_COUNT);

    let writer = match RmtStripWriter::new(led_pin, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer) {
        Ok(writer) => writer,
        Err(e) => {
            error!("Poller: RMT init failed: {}", e);
            return;
        }
    };
    info!("Poller: LED strip on GPIO{}", LED_GPIO_PIN);

    let mut poller = match BoardPoller::new(&config, writer) {
        Ok(poller) => poller,
        Err(e) => {
            error!("Poller: Invalid configuration: {}", e);
            return;
        }
    };

    // Strip beim Booten ausschalten
    if poller.start().is_err() {
        error!("Poller: Failed to clear LED strip");
    }

    board_poller_loop(poller, stack).await
}
