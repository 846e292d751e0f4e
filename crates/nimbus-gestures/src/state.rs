//! Per-gesture tracking state.
//!
//! Each controller owns its own [`GestureState`]; transitions consume the old
//! value and return the new one, so one gesture can never leak into the next.

use std::time::Duration;

use crate::sample::TouchSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Tracking,
    Committed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub phase: GesturePhase,
    pub origin: TouchSample,
    pub last: TouchSample,
    /// Path length travelled so far.
    pub accumulated_distance: f64,
    pub start_time: Duration,
}

impl GestureState {
    pub fn begin(origin: TouchSample) -> Self {
        Self {
            phase: GesturePhase::Tracking,
            origin,
            last: origin,
            accumulated_distance: 0.,
            start_time: origin.t,
        }
    }

    /// Folds in a new sample. Only a tracking gesture moves.
    #[must_use]
    pub fn advance(self, sample: TouchSample) -> Self {
        if self.phase != GesturePhase::Tracking {
            return self;
        }

        Self {
            accumulated_distance: self.accumulated_distance + self.last.distance_to(&sample),
            last: sample,
            ..self
        }
    }

    #[must_use]
    pub fn commit(self) -> Self {
        Self {
            phase: GesturePhase::Committed,
            ..self
        }
    }

    #[must_use]
    pub fn cancel(self) -> Self {
        Self {
            phase: GesturePhase::Cancelled,
            ..self
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.phase == GesturePhase::Tracking
    }

    pub fn delta_x(&self) -> f64 {
        self.last.x - self.origin.x
    }

    pub fn delta_y(&self) -> f64 {
        self.last.y - self.origin.y
    }

    pub fn elapsed(&self) -> Duration {
        self.last.t.saturating_sub(self.start_time)
    }
}
