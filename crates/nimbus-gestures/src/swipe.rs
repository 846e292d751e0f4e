//! Horizontal swipe navigation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::recognizer::{GestureRecognizer, SemanticEvent};
use crate::resistance::ResistanceModel;
use crate::sample::{TouchEvent, TouchPhase, TouchSample};
use crate::state::GestureState;

pub const DEFAULT_MIN_DISTANCE_PX: f64 = 50.0;
pub const DEFAULT_MAX_VERTICAL_PX: f64 = 100.0;
pub const DEFAULT_MAX_DURATION_MS: u64 = 300;
pub const DEFAULT_FEEDBACK_RESISTANCE: f64 = 0.3;
pub const DEFAULT_FEEDBACK_CAP_PX: f64 = 120.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeConfig {
    /// Horizontal travel that must be exceeded.
    #[serde(default = "default_min_distance")]
    pub min_distance: f64,
    /// Vertical drift must stay below this.
    #[serde(default = "default_max_vertical")]
    pub max_vertical: f64,
    /// The whole gesture must finish faster than this.
    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: u64,
    #[serde(default = "default_feedback_resistance")]
    pub feedback_resistance: f64,
    #[serde(default = "default_feedback_cap")]
    pub feedback_cap: f64,
}

fn default_min_distance() -> f64 {
    DEFAULT_MIN_DISTANCE_PX
}

fn default_max_vertical() -> f64 {
    DEFAULT_MAX_VERTICAL_PX
}

fn default_max_duration_ms() -> u64 {
    DEFAULT_MAX_DURATION_MS
}

fn default_feedback_resistance() -> f64 {
    DEFAULT_FEEDBACK_RESISTANCE
}

fn default_feedback_cap() -> f64 {
    DEFAULT_FEEDBACK_CAP_PX
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            min_distance: default_min_distance(),
            max_vertical: default_max_vertical(),
            max_duration_ms: default_max_duration_ms(),
            feedback_resistance: default_feedback_resistance(),
            feedback_cap: default_feedback_cap(),
        }
    }
}

impl SwipeConfig {
    pub fn max_duration(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms)
    }

    pub fn feedback_model(&self) -> ResistanceModel {
        ResistanceModel::new(self.feedback_resistance, self.feedback_cap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Why a completed gesture did not count as a swipe, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeRejection {
    InsufficientDistance,
    TooVertical,
    TooSlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeResult {
    /// `None` when the gesture was not a swipe.
    pub direction: Option<SwipeDirection>,
    pub distance: f64,
    pub duration_ms: u64,
    /// Horizontal speed in px/s.
    pub velocity: f64,
    pub rejection: Option<SwipeRejection>,
}

impl SwipeResult {
    pub fn is_swipe(&self) -> bool {
        self.direction.is_some()
    }
}

/// Classifies a completed gesture from its first and last samples.
pub fn classify(origin: &TouchSample, last: &TouchSample, config: &SwipeConfig) -> SwipeResult {
    let delta_x = last.x - origin.x;
    let delta_y = (last.y - origin.y).abs();
    let elapsed = last.t.saturating_sub(origin.t);

    let distance = delta_x.abs();
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    // Same-timestamp samples would divide by zero.
    let velocity = distance / duration_ms.max(1) as f64 * 1000.;

    let rejection = if distance <= config.min_distance {
        Some(SwipeRejection::InsufficientDistance)
    } else if delta_y >= config.max_vertical {
        Some(SwipeRejection::TooVertical)
    } else if elapsed >= config.max_duration() {
        Some(SwipeRejection::TooSlow)
    } else {
        None
    };

    let direction = match rejection {
        Some(_) => None,
        None if delta_x > 0. => Some(SwipeDirection::Right),
        None => Some(SwipeDirection::Left),
    };

    SwipeResult {
        direction,
        distance,
        duration_ms,
        velocity,
        rejection,
    }
}

type SwipeCallback = Box<dyn FnMut() + Send>;

pub struct SwipeNavigationController {
    config: SwipeConfig,
    feedback: ResistanceModel,
    gesture: Option<GestureState>,
    on_left: Option<SwipeCallback>,
    on_right: Option<SwipeCallback>,
    last_result: Option<SwipeResult>,
}

impl std::fmt::Debug for SwipeNavigationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeNavigationController")
            .field("config", &self.config)
            .field("gesture", &self.gesture)
            .field("last_result", &self.last_result)
            .finish()
    }
}

impl Default for SwipeNavigationController {
    fn default() -> Self {
        Self::new(SwipeConfig::default())
    }
}

impl SwipeNavigationController {
    pub fn new(config: SwipeConfig) -> Self {
        let feedback = config.feedback_model();
        Self {
            config,
            feedback,
            gesture: None,
            on_left: None,
            on_right: None,
            last_result: None,
        }
    }

    pub fn on_left(&mut self, callback: impl FnMut() + Send + 'static) {
        self.on_left = Some(Box::new(callback));
    }

    pub fn on_right(&mut self, callback: impl FnMut() + Send + 'static) {
        self.on_right = Some(Box::new(callback));
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn last_result(&self) -> Option<&SwipeResult> {
        self.last_result.as_ref()
    }

    /// Rubber-banded horizontal offset for the screen under the finger.
    pub fn drag_offset(&self) -> f64 {
        self.gesture
            .map(|g| self.feedback.apply_signed(g.delta_x()))
            .unwrap_or(0.)
    }

    fn finish(&mut self, gesture: GestureState) -> SemanticEvent {
        let result = classify(&gesture.origin, &gesture.last, &self.config);
        self.last_result = Some(result);

        let Some(direction) = result.direction else {
            let reason = result.rejection.unwrap_or(SwipeRejection::InsufficientDistance);
            tracing::debug!(
                ?reason,
                distance = result.distance,
                duration_ms = result.duration_ms,
                "Gesture not a swipe"
            );
            return SemanticEvent::SwipeRejected { reason };
        };

        let callback = match direction {
            SwipeDirection::Left => self.on_left.as_mut(),
            SwipeDirection::Right => self.on_right.as_mut(),
        };
        match callback {
            Some(callback) => callback(),
            None => tracing::trace!(?direction, "No handler registered for swipe"),
        }

        tracing::info!(
            ?direction,
            distance = result.distance,
            velocity = result.velocity,
            "Swipe detected"
        );
        SemanticEvent::SwipeDetected(result)
    }
}

impl GestureRecognizer for SwipeNavigationController {
    fn feed(&mut self, event: &TouchEvent) -> Option<SemanticEvent> {
        match event.phase {
            TouchPhase::Start => {
                self.gesture = Some(GestureState::begin(event.sample));
                None
            }
            TouchPhase::Move => {
                self.gesture = self.gesture.map(|g| g.advance(event.sample));
                None
            }
            TouchPhase::End => {
                let gesture = self.gesture.take()?.advance(event.sample);
                Some(self.finish(gesture.commit()))
            }
            TouchPhase::Cancel => {
                self.gesture = None;
                None
            }
        }
    }

    fn reset(&mut self) {
        self.gesture = None;
    }

    fn is_tracking(&self) -> bool {
        self.gesture.is_some_and(|g| g.is_tracking())
    }
}
