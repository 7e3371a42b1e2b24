//! Zähler für den Helligkeits-Refresh
//!
//! Pro Loop-Durchlauf wird einmal `tick()` aufgerufen. Überschreitet der
//! Zähler die Schwelle (`counter > threshold`), wird er zurückgesetzt und
//! die Helligkeit neu geholt. Bei Schwelle 200 ist die Periode damit
//! 201 Durchläufe.

/// Standard-Schwelle für den Helligkeits-Refresh
pub const DEFAULT_REFRESH_THRESHOLD: u32 = 200;

/// Was im aktuellen Durchlauf nach dem Board-Poll passiert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollMode {
    /// Nur Board abfragen
    PollingBoard,
    /// Einmalig Helligkeit holen, danach wieder `PollingBoard`
    RefreshingBrightness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    counter: u32,
    threshold: u32,
}

impl PollSchedule {
    pub const fn new(threshold: u32) -> Self {
        Self {
            counter: 0,
            threshold,
        }
    }

    /// Durchläufe seit dem letzten Refresh (immer `<= threshold`)
    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Zählt einen Durchlauf
    pub fn tick(&mut self) -> PollMode {
        self.counter = self.counter.saturating_add(1);
        if self.counter > self.threshold {
            self.counter = 0;
            PollMode::RefreshingBrightness
        } else {
            PollMode::PollingBoard
        }
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_THRESHOLD)
    }
}
