// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

use board_core::PollerConfig;
use embassy_net::Ipv4Address;

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin für die Datenleitung des Strips (WS2812/Neopixel)
/// Muss zum Peripheral in main.rs passen (`peripherals.GPIO4`)
pub const LED_GPIO_PIN: u8 = 4;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Frames pro Sekunde nach einem erfolgreich gerenderten Board
pub const FRAME_RATE: u16 = 50;

/// Schwelle für den Helligkeits-Refresh
/// Helligkeit wird jeden `BRIGHTNESS_REFRESH_FRAMES + 1`-ten Durchlauf geholt
pub const BRIGHTNESS_REFRESH_FRAMES: u32 = 200;

// ============================================================================
// WiFi Konfiguration (Access Point)
// ============================================================================

/// SSID des Access Points, den der ESP32 aufspannt
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WPA2-Passwort des Access Points (leer = offenes Netz)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Kanal des Access Points
pub const WIFI_CHANNEL: u8 = 1;

/// Maximale Anzahl gleichzeitig verbundener Stationen
pub const WIFI_MAX_CONNECTIONS: u16 = 4;

/// Eigene Adresse im AP-Netz
pub const AP_IP_ADDRESS: Ipv4Address = Ipv4Address::new(192, 168, 4, 1);

/// Prefix-Länge des AP-Netzes (/24)
pub const AP_PREFIX_LEN: u8 = 24;

/// Wartezeit nach fehlgeschlagenem AP-Start
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// Gesamt-Heap: ~100 KB für WiFi-Stack

/// Socket-Slots für embassy-net: HTTP-Client (1) + DHCP-Server (1) + Reserve
pub const NET_SOCKETS: usize = 4;

// ============================================================================
// Server Konfiguration
// ============================================================================

/// Endpunkt für den Board-Zustand
/// Wird zur Build-Zeit aus der Environment Variable BOARD_URL geladen
pub const BOARD_URL: &str = env!(
    "BOARD_URL",
    "Board URL nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Endpunkt für die Helligkeit
/// Wird zur Build-Zeit aus der Environment Variable BRIGHTNESS_URL geladen
pub const BRIGHTNESS_URL: &str = env!(
    "BRIGHTNESS_URL",
    "Brightness URL nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

// ============================================================================
// HTTP Client Konfiguration
// ============================================================================

/// Timeout für Verbindungsaufbau und jede Lese-/Schreiboperation
pub const HTTP_TIMEOUT_SECS: u64 = 5;

/// Empfangs-Buffer für eine komplette Antwort (Header + Body)
/// 50 Board-Einträge à `{"color":"COLOR1"}` passen locker hinein
pub const HTTP_RESPONSE_BUFFER_SIZE: usize = 4096;

/// TCP RX Buffer-Größe in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1536;

/// TCP TX Buffer-Größe in Bytes
/// Request ist nur der Header (< 256 Bytes)
pub const TCP_TX_BUFFER_SIZE: usize = 512;

// ============================================================================
// DHCP Server Konfiguration
// ============================================================================

/// UDP-Port des DHCP-Servers
pub const DHCP_SERVER_PORT: u16 = 67;

/// UDP-Port der DHCP-Clients (Ziel der Broadcast-Antworten)
pub const DHCP_CLIENT_PORT: u16 = 68;

/// Buffer-Größe für ein DHCP-Paket (RX, TX und Encode)
pub const DHCP_PACKET_SIZE: usize = 600;

/// Erste vergebene Adresse, bekommt der Server mit den Board-Daten
pub const DHCP_RANGE_START: Ipv4Address = Ipv4Address::new(192, 168, 4, 2);

/// Letzte vergebene Adresse
pub const DHCP_RANGE_END: Ipv4Address = Ipv4Address::new(192, 168, 4, 9);

/// Maximale Anzahl gleichzeitiger Leases
pub const DHCP_MAX_LEASES: usize = 8;

/// Paket-Metadaten-Slots für den DHCP-Server
pub const DHCP_UDP_META_SLOTS: usize = 4;

/// Laufzeit-Konfiguration des Pollers aus den Build-Konstanten
pub const fn poller_config() -> PollerConfig<'static> {
    PollerConfig::new(WIFI_SSID, WIFI_PASSWORD, BOARD_URL, BRIGHTNESS_URL)
        .with_frame_rate(FRAME_RATE)
        .with_brightness_refresh_frames(BRIGHTNESS_REFRESH_FRAMES)
}
