use crate::playback::model::{PlaybackModel, Timing};

/// Slack added before flooring `local / step`, so an offset that lands on a
/// frame boundary up to rounding (`0.3 / 0.1 = 2.9999999999999996`) selects
/// the frame starting there.
const FRAME_EPSILON: f64 = 1e-9;

/// Maps elapsed wall-clock time to a frame index of `model`.
///
/// `offset = elapsed * speed`; the sign of `speed` sets the direction and its
/// magnitude the rate. A zero speed holds the model's current frame.
///
/// - before `start`: frame 0
/// - within `[start, stop]`: `floor((offset - start) / step)`
/// - after `stop`: the offset wraps modulo the recording length
///
/// The result is always clamped to a valid frame.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn map_frame(model: &PlaybackModel, elapsed: f64, speed: f64) -> usize {
    let frame_count = model.frame_count();
    if speed == 0.0 {
        return model.current_frame().min(frame_count.saturating_sub(1));
    }
    frame_for_offset(&model.timing(), elapsed * speed, frame_count)
}

/// Frame index for a media-time offset; see [`map_frame`].
///
/// Frame `i` covers the half-open interval `[start + i*step, start + (i+1)*step)`.
#[must_use]
pub fn frame_for_offset(timing: &Timing, offset: f64, frame_count: usize) -> usize {
    let Some(last) = frame_count.checked_sub(1) else {
        return 0;
    };
    if !offset.is_finite() || offset < timing.start {
        return 0;
    }

    let local = if offset <= timing.stop {
        offset - timing.start
    } else {
        (offset - timing.start).rem_euclid(timing.duration())
    };

    let index = (local / timing.step + FRAME_EPSILON).floor();
    if index <= 0.0 {
        0
    } else {
        (index as usize).min(last)
    }
}
