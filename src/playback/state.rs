/// Play/pause flag, signed speed and the elapsed-time origin.
///
/// Elapsed time is wall-clock seconds since the origin while playing and
/// frozen while paused. The mapper multiplies it by `speed` to get the media
/// offset.
///
/// Changing speed rebases the origin so the media offset is continuous across
/// the change: switching from `1.0` to `-1.0` at offset 5s plays backwards
/// from 5s instead of jumping to -5s. A seek takes precedence: a speed change
/// never rescales a pending seek, and leaving zero speed after a seek resumes
/// from the seek target rather than the held offset.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    is_playing: bool,
    speed: f64,
    origin: f64,
    frozen_elapsed: f64,
    // Media offset held while speed is zero, restored by the next non-zero
    // speed. A seek replaces it.
    held_offset: Option<f64>,
    pending_seek: Option<f64>,
}

/// Read-only copy of the playback state at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub speed: f64,
    pub elapsed: f64,
}

impl PlaybackState {
    #[must_use]
    pub fn new(now: f64, autoplay: bool, speed: f64) -> Self {
        Self {
            is_playing: autoplay,
            speed,
            origin: now,
            frozen_elapsed: 0.0,
            held_offset: None,
            pending_seek: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    #[inline]
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Elapsed seconds as of `now`, without resolving a pending seek.
    #[must_use]
    pub fn elapsed(&self, now: f64) -> f64 {
        if let Some(t) = self.pending_seek {
            t
        } else if self.is_playing {
            now - self.origin
        } else {
            self.frozen_elapsed
        }
    }

    #[must_use]
    pub fn status(&self, now: f64) -> PlaybackStatus {
        PlaybackStatus {
            is_playing: self.is_playing,
            speed: self.speed,
            elapsed: self.elapsed(now),
        }
    }

    pub fn play(&mut self, now: f64) {
        if self.is_playing {
            return;
        }
        if self.pending_seek.is_none() {
            self.origin = now - self.frozen_elapsed;
        }
        self.is_playing = true;
    }

    pub fn pause(&mut self, now: f64) {
        if !self.is_playing {
            return;
        }
        if self.pending_seek.is_none() {
            self.frozen_elapsed = now - self.origin;
        }
        self.is_playing = false;
    }

    #[allow(clippy::float_cmp)]
    pub fn set_speed(&mut self, now: f64, speed: f64) {
        if !speed.is_finite() || speed == self.speed {
            return;
        }
        if self.pending_seek.is_some() {
            self.held_offset = None;
        } else if self.speed == 0.0 {
            if let Some(offset) = self.held_offset.take() {
                self.rebase(now, offset / speed);
            }
        } else {
            let offset = self.elapsed(now) * self.speed;
            if speed == 0.0 {
                self.held_offset = Some(offset);
            } else {
                self.rebase(now, offset / speed);
            }
        }
        self.speed = speed;
    }

    /// Seeks so that the next eligible tick sees exactly `t` elapsed seconds.
    pub fn set_time(&mut self, t: f64) {
        if t.is_finite() {
            self.pending_seek = Some(t);
            self.held_offset = None;
        }
    }

    /// Elapsed seconds for the tick at `now`. Resolves a pending seek by
    /// moving the origin so that time keeps running from `t`.
    pub fn advance(&mut self, now: f64) -> f64 {
        if let Some(t) = self.pending_seek.take() {
            self.rebase(now, t);
            return t;
        }
        self.elapsed(now)
    }

    fn rebase(&mut self, now: f64, elapsed: f64) {
        if self.is_playing {
            self.origin = now - elapsed;
        } else {
            self.frozen_elapsed = elapsed;
        }
    }
}
