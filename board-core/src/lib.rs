//! Board Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, Protokolle und die komplette Poll-Logik,
//! damit alles auf dem Host testbar bleibt.

#![no_std]

#[macro_use]
mod fmt;

pub mod color;
pub mod config;
pub mod frame;
pub mod http;
pub mod poller;
pub mod protocol;
pub mod schedule;
pub mod traits;

/// Anzahl der LEDs im Strip
pub const LED_COUNT: usize = 50;

// Re-exports für einfachen Zugriff
pub use color::{ColorName, lookup};
pub use config::{ConfigError, Endpoints, PollerConfig};
pub use frame::{Frame, MAX_BRIGHTNESS, clamp_brightness};
pub use http::{HttpError, HttpUrl, Response, UrlError};
pub use poller::{BoardPoller, CycleReport, PollOutcome};
pub use protocol::{BoardSnapshot, ProtocolError};
pub use schedule::{PollMode, PollSchedule};
pub use traits::{FrameTimer, HttpClient, LedError, StripWriter};
