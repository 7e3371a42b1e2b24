// FrameTimer über embassy-time

use board_core::FrameTimer;
use embassy_time::Timer;

/// Wartet asynchron, gibt die CPU an andere Tasks zurück
#[derive(Default)]
pub struct EmbassyFrameTimer;

impl FrameTimer for EmbassyFrameTimer {
    async fn wait_ms(&mut self, ms: u64) {
        Timer::after_millis(ms).await;
    }
}
