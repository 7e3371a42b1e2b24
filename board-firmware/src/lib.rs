// Library-Root: Hardware-Anbindung und Tasks der Firmware
// Keine Standard-Bibliothek (Embedded System)
//
// Die komplette Poll-Logik liegt in board-core und wird auf dem Host
// getestet (board-tests). Hier sitzen nur die Trait-Implementierungen
// für das ESP32-C6 und die Embassy Tasks, die sie verdrahten.
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von board-core
pub use board_core::{BoardPoller, LED_COUNT, PollerConfig};
