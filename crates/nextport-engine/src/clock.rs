//! Simulated clock with discrete, monotonically non-decreasing time.

/// Simulated time source.
///
/// Time is a scalar in simulation units, decoupled from wall-clock time,
/// advanced only by explicit [`SimClock::advance_to`] calls. Attempts to
/// move backwards are ignored, so the clock is monotone by construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimClock {
    now: f64,
}

impl SimClock {
    /// Creates a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advances the clock to `time`. Moving backwards is a no-op.
    pub fn advance_to(&mut self, time: f64) {
        debug_assert!(time >= self.now, "clock moved backwards: {} -> {time}", self.now);
        if time > self.now {
            self.now = time;
        }
    }
}
