/// Slack absorbed when comparing a refresh delta with the tick interval, so a
/// host refreshing at exactly the target rate is not skipped by rounding.
const TICK_EPSILON: f64 = 1e-9;

/// Fixed-interval tick throttle.
///
/// The host calls [`poll`](Self::poll) on every display refresh; at most one
/// poll per `1 / fps` seconds is eligible, independent of the host's native
/// refresh rate.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    interval: f64,
    last_tick: f64,
    tick_count: u64,
}

impl PlaybackClock {
    /// `fps` must be positive and finite; callers validate it through
    /// [`ViewerConfig::validate`](crate::ViewerConfig::validate).
    #[must_use]
    pub fn new(fps: f64, now: f64) -> Self {
        Self {
            interval: 1.0 / fps,
            last_tick: now,
            tick_count: 0,
        }
    }

    /// Returns whether `now` is an eligible tick. An eligible poll moves
    /// `last_tick` to `now`; a skipped poll changes nothing.
    pub fn poll(&mut self, now: f64) -> bool {
        let delta = now - self.last_tick;
        if delta + TICK_EPSILON < self.interval {
            log::trace!("Tick skipped: {:.2}ms since last", delta * 1000.0);
            return false;
        }
        self.last_tick = now;
        self.tick_count += 1;
        true
    }

    /// Seconds between eligible ticks.
    #[inline]
    #[must_use]
    pub fn interval(&self) -> f64 {
        self.interval
    }

    #[inline]
    #[must_use]
    pub fn last_tick(&self) -> f64 {
        self.last_tick
    }

    /// Number of eligible ticks so far.
    #[inline]
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
