// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus board-core für das ESP32-C6:
// LED-Strip über RMT, HTTP über embassy-net, Wartezeiten über embassy-time.

pub mod http_client;
pub mod led_writer;
pub mod timer;

pub use http_client::TcpHttpClient;
pub use led_writer::{RMT_BUFFER_SIZE, RmtInitError, RmtStripWriter};
pub use timer::EmbassyFrameTimer;
