//! Frame clock: wall-clock pacing for automatic playback.
//!
//! Turns a render loop of arbitrary speed into discrete ticks spaced by a
//! configurable interval. Missed intervals are absorbed rather than replayed,
//! so a slow frame never produces a burst of catch-up steps.

/// Default pacing interval in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 500;

/// Interval-based tick source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameClock {
    /// Minimum milliseconds between two fires.
    interval_ms: u64,
    /// Timestamp of the last fire (or of arming).
    last_fire_ms: Option<u64>,
    /// Number of fires since construction or the last reset.
    fire_count: u64,
}

impl FrameClock {
    /// Create a clock that fires at most once every `interval_ms`.
    #[must_use]
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: None,
            fire_count: 0,
        }
    }

    /// Configured interval in milliseconds.
    #[must_use]
    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Change the interval. Applies from the next `tick`.
    #[allow(clippy::missing_const_for_fn)] // Mutable const not stable
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    /// Number of fires since the clock was created or reset.
    #[must_use]
    pub const fn fire_count(&self) -> u64 {
        self.fire_count
    }

    /// Whether the clock has a reference timestamp.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.last_fire_ms.is_some()
    }

    /// Observe the current time; returns `true` if an interval has elapsed.
    ///
    /// The first observation after construction or [`rearm`](Self::rearm)
    /// only records the reference point. Timestamps that go backwards never
    /// fire.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let Some(last) = self.last_fire_ms else {
            self.last_fire_ms = Some(now_ms);
            return false;
        };

        if now_ms < last || now_ms - last < self.interval_ms {
            return false;
        }

        self.last_fire_ms = Some(now_ms);
        self.fire_count += 1;
        true
    }

    /// Forget the reference timestamp; the next `tick` re-arms.
    #[allow(clippy::missing_const_for_fn)] // Mutable const not stable
    pub fn rearm(&mut self) {
        self.last_fire_ms = None;
    }

    /// Rearm and zero the fire counter.
    #[allow(clippy::missing_const_for_fn)] // Mutable const not stable
    pub fn reset(&mut self) {
        self.last_fire_ms = None;
        self.fire_count = 0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_MS)
    }
}
