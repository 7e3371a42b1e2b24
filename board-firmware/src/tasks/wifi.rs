// WiFi Task - Spannt den Access Point auf, in den sich der Server einwählt
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{AccessPointConfig, AuthMethod, ModeConfig, WifiController, WifiDevice, WifiEvent};

use board_core::PollerConfig;

use crate::config::{WIFI_CHANNEL, WIFI_MAX_CONNECTIONS, WIFI_RETRY_DELAY_SECS};

/// Konfiguration für den AP-Modus
///
/// Leeres Passwort = offenes Netz, sonst WPA2-Personal.
/// SSID und Passwort kommen aus der geprüften Poller-Konfiguration.
fn access_point_config(poller: &PollerConfig<'_>) -> ModeConfig {
    let config = AccessPointConfig::default()
        .with_ssid(poller.ssid.into())
        .with_channel(WIFI_CHANNEL)
        .with_max_connections(WIFI_MAX_CONNECTIONS);

    let config = if poller.is_open_network() {
        config.with_auth_method(AuthMethod::None)
    } else {
        config
            .with_auth_method(AuthMethod::Wpa2Personal)
            .with_password(poller.password.into())
    };

    ModeConfig::AccessPoint(config)
}

/// Access Point Task
///
/// Managed den Access Point:
/// - Konfiguriert und startet den AP
/// - Startet ihn neu falls er gestoppt wird
#[embassy_executor::task]
pub async fn access_point_task(
    mut controller: WifiController<'static>,
    config: PollerConfig<'static>,
) {
    info!("WiFi: Starting access point task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring access point '{}'...", config.ssid);

            if let Err(e) = controller.set_config(&access_point_config(&config)) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            info!(
                "WiFi: Access point up ({})",
                if config.is_open_network() { "open" } else { "WPA2" }
            );
        }

        controller.wait_for_event(WifiEvent::ApStop).await;
        warn!("WiFi: Access point stopped, restarting...");

        Timer::after(Duration::from_secs(2)).await;
    }
}

/// Network Task
///
/// Überwacht den Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - Managed TCP/IP Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// Wartet bis der AP-Link steht
pub async fn wait_for_link(stack: Stack<'static>) {
    while !stack.is_link_up() {
        Timer::after(Duration::from_millis(500)).await;
    }

    if let Some(config) = stack.config_v4() {
        info!("WiFi: Link is up");
        info!("  IP:      {}", Debug2Format(&config.address.address()));
    }
}
