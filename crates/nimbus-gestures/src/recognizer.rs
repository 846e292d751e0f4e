use serde::Serialize;

use crate::sample::TouchEvent;
use crate::swipe::{SwipeRejection, SwipeResult};

/// Application-meaningful occurrence derived from the raw touch stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SemanticEvent {
    PullProgressChanged { progress: f64 },
    /// Progress crossed the trigger ratio; releasing now refreshes.
    PullReady { progress: f64 },
    PullTriggered,
    PullCancelled,
    RefreshStarted,
    RefreshResolved { ok: bool },
    SwipeDetected(SwipeResult),
    SwipeRejected { reason: SwipeRejection },
}

/// A controller that consumes normalized touch events one at a time.
pub trait GestureRecognizer {
    /// Feeds one event, strictly in arrival order.
    fn feed(&mut self, event: &TouchEvent) -> Option<SemanticEvent>;

    /// Collapses any in-progress gesture to its neutral state.
    fn reset(&mut self);

    fn is_tracking(&self) -> bool;
}
