//! Normalization of raw pointer events into timestamped touch samples.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Travel (px) from the origin after which a controlled drag may suppress
/// the platform's default scrolling.
pub const DEFAULT_DEADZONE_PX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Start,
    Move,
    End,
    Cancel,
}

/// One event as delivered by the platform for a single contact point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPointerEvent {
    pub kind: PointerKind,
    pub pointer_id: u32,
    pub x: f64,
    pub y: f64,
    /// Monotonic time since an arbitrary origin.
    pub timestamp: Duration,
}

impl RawPointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64, timestamp: Duration) -> Self {
        Self {
            kind,
            pointer_id: 0,
            x,
            y,
            timestamp,
        }
    }

    pub fn with_pointer(mut self, pointer_id: u32) -> Self {
        self.pointer_id = pointer_id;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    pub x: f64,
    pub y: f64,
    pub t: Duration,
}

impl TouchSample {
    pub fn new(x: f64, y: f64, t: Duration) -> Self {
        Self { x, y, t }
    }

    pub fn distance_to(&self, other: &TouchSample) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

impl From<PointerKind> for TouchPhase {
    fn from(kind: PointerKind) -> Self {
        match kind {
            PointerKind::Start => Self::Start,
            PointerKind::Move => Self::Move,
            PointerKind::End => Self::End,
            PointerKind::Cancel => Self::Cancel,
        }
    }
}

/// Normalized event handed to the gesture controllers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub sample: TouchSample,
    /// First sample of the contact this event belongs to.
    pub origin: TouchSample,
    /// The contact has travelled past the deadzone.
    pub suppress_default: bool,
}

#[derive(Debug, Clone, Copy)]
struct ActiveContact {
    pointer_id: u32,
    origin: TouchSample,
    last: TouchSample,
    past_deadzone: bool,
}

/// Turns raw pointer events into [`TouchEvent`]s for a single finger.
///
/// Keeps no history beyond the first and the last sample of the active
/// contact. An inert sampler (touch input unavailable) never emits anything.
#[derive(Debug)]
pub struct TouchSampler {
    enabled: bool,
    deadzone: f64,
    active: Option<ActiveContact>,
}

impl Default for TouchSampler {
    fn default() -> Self {
        Self::new(DEFAULT_DEADZONE_PX)
    }
}

impl TouchSampler {
    pub fn new(deadzone: f64) -> Self {
        Self {
            enabled: true,
            deadzone,
            active: None,
        }
    }

    /// Sampler for platforms without touch input.
    pub fn inert() -> Self {
        Self {
            enabled: false,
            deadzone: DEFAULT_DEADZONE_PX,
            active: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_tracking(&self) -> bool {
        self.active.is_some()
    }

    /// Whether the active contact has left the deadzone.
    pub fn past_deadzone(&self) -> bool {
        self.active.is_some_and(|c| c.past_deadzone)
    }

    pub fn feed(&mut self, raw: RawPointerEvent) -> Option<TouchEvent> {
        if !self.enabled {
            return None;
        }

        let sample = TouchSample::new(raw.x, raw.y, raw.timestamp);

        if raw.kind == PointerKind::Start {
            if let Some(active) = &self.active {
                if active.pointer_id != raw.pointer_id {
                    tracing::trace!(
                        "ignoring second contact {} while {} is active",
                        raw.pointer_id,
                        active.pointer_id
                    );
                    return None;
                }
                tracing::debug!("contact {} restarted without an end event", raw.pointer_id);
            }

            self.active = Some(ActiveContact {
                pointer_id: raw.pointer_id,
                origin: sample,
                last: sample,
                past_deadzone: false,
            });
            return Some(TouchEvent {
                phase: TouchPhase::Start,
                sample,
                origin: sample,
                suppress_default: false,
            });
        }

        let Some(active) = self.active.as_mut() else {
            tracing::trace!("ignoring {:?} without a matching start", raw.kind);
            return None;
        };
        if active.pointer_id != raw.pointer_id {
            tracing::trace!("ignoring {:?} for inactive contact {}", raw.kind, raw.pointer_id);
            return None;
        }

        match raw.kind {
            PointerKind::Move => {
                if sample.t < active.last.t {
                    tracing::trace!(
                        "ignoring sample with timestamp {:?} earlier than last {:?}",
                        sample.t,
                        active.last.t
                    );
                    return None;
                }

                active.last = sample;
                if active.origin.distance_to(&sample) > self.deadzone {
                    active.past_deadzone = true;
                }

                Some(TouchEvent {
                    phase: TouchPhase::Move,
                    sample,
                    origin: active.origin,
                    suppress_default: active.past_deadzone,
                })
            }
            PointerKind::End | PointerKind::Cancel => {
                let contact = *active;
                self.active = None;

                // A terminating event must never travel back in time.
                let sample = TouchSample {
                    t: sample.t.max(contact.last.t),
                    ..sample
                };
                Some(TouchEvent {
                    phase: raw.kind.into(),
                    sample,
                    origin: contact.origin,
                    suppress_default: false,
                })
            }
            PointerKind::Start => None,
        }
    }
}
