use std::time::{Duration, Instant};

use agc_core::cpu::agc::CYCLE_US;

/// Only sleep once the machine is this far ahead of the wall clock.
const SLACK: Duration = Duration::from_millis(1);

/// Keeps cumulative machine cycles in step with real time.
pub struct Pacer {
    start: Instant,
}

impl Pacer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Machine time covered by `cycles`.
    pub fn machine_time(cycles: u64) -> Duration {
        Duration::from_micros(cycles.saturating_mul(CYCLE_US))
    }

    /// How long to sleep after `cycles` when `elapsed` wall time has passed.
    pub fn lead(cycles: u64, elapsed: Duration) -> Option<Duration> {
        let ahead = Self::machine_time(cycles).saturating_sub(elapsed);
        (ahead > SLACK).then_some(ahead)
    }

    pub fn pace(&self, cycles: u64) {
        if let Some(ahead) = Self::lead(cycles, self.start.elapsed()) {
            spin_sleep::sleep(ahead);
        }
    }
}
