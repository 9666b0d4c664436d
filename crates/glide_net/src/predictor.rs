//! Predictive interpolation between authoritative updates
//!
//! From the two most recent samples we extrapolate one network interval
//! ahead, assuming constant velocity, then glide from wherever the renderer
//! was when the update landed (the anchor) toward that predicted point over
//! the same interval:
//!
//! ```text
//!   p0 ─────── p1 ─────── predicted = p1 + (p1 - p0)
//!                 anchor ──x──▶ predicted      x = clamp(elapsed / Δt, 0, 1)
//! ```
//!
//! This hides the jump to each new authoritative position and keeps the
//! rendered position from trailing the host when updates arrive regularly.
//! No acceleration or collision is modelled.

use glide_core::math::{blend, DVec2};
use std::time::Duration;

use crate::history::HistoryBuffer;

/// Render-side state between two ingestions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PredictionState {
    /// Position the renderer showed when the latest update was ingested
    pub anchor: DVec2,
    /// Render time accumulated since that update
    pub elapsed: Duration,
}

impl PredictionState {
    pub fn anchored_at(anchor: DVec2) -> Self {
        Self {
            anchor,
            elapsed: Duration::ZERO,
        }
    }
}

/// One-interval-ahead extrapolation from a two-sample history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrapolation {
    /// Units per second between the two samples
    pub velocity: DVec2,
    /// Where the next update is expected to land
    pub predicted: DVec2,
    /// Receipt-time gap between the two samples
    pub interval: Duration,
}

/// Extrapolate from `history`.
///
/// `None` with fewer than two samples, or when both arrived on the same
/// clock reading and the velocity is undefined.
pub fn extrapolate(history: &HistoryBuffer) -> Option<Extrapolation> {
    let (older, newer) = history.pair()?;
    let interval = newer.received_at.checked_sub(older.received_at)?;
    if interval.is_zero() {
        return None;
    }

    let step = newer.position - older.position;
    Some(Extrapolation {
        velocity: step / interval.as_secs_f64(),
        // velocity * interval is the last step; add it directly so the
        // prediction does not pick up rounding from the division
        predicted: newer.position + step,
        interval,
    })
}

/// Interpolated position for the given history and prediction state.
pub fn interpolate(history: &HistoryBuffer, state: &PredictionState) -> Option<DVec2> {
    let extrapolation = extrapolate(history)?;
    let fraction = state.elapsed.as_secs_f64() / extrapolation.interval.as_secs_f64();
    Some(blend(
        state.anchor,
        extrapolation.predicted,
        fraction.clamp(0.0, 1.0),
    ))
}

/// Per-frame driver around [`interpolate`] that remembers what was rendered.
#[derive(Debug, Clone, Default)]
pub struct PositionPredictor {
    state: PredictionState,
    position: DVec2,
}

impl PositionPredictor {
    pub fn new(initial: DVec2) -> Self {
        Self {
            state: PredictionState::anchored_at(initial),
            position: initial,
        }
    }

    /// Last rendered position.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn state(&self) -> PredictionState {
        self.state
    }

    /// A new update was ingested: anchor at the current rendered position
    /// and restart the interval.
    pub fn latch(&mut self) {
        self.state = PredictionState::anchored_at(self.position);
    }

    /// Compute this frame's position, then advance elapsed time by `dt`.
    ///
    /// When nothing can be extrapolated the previous position is kept and
    /// elapsed time does not move.
    pub fn advance(&mut self, history: &HistoryBuffer, dt: Duration) -> DVec2 {
        if let Some(position) = interpolate(history, &self.state) {
            self.position = position;
            self.state.elapsed += dt;
        }
        self.position
    }
}
