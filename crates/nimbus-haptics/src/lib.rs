//! Haptic feedback for Nimbus
//!
//! Semantic events (weather readings, gesture milestones, UI actions) map to
//! [`HapticPattern`]s through pure generators in [`patterns`]. The
//! [`HapticEngine`] gates every dispatch through a per-category cooldown and
//! hands the survivors to a [`HapticSink`].

pub mod engine;
pub mod pattern;
pub mod patterns;
pub mod playback;
pub mod rate_limit;
pub mod sink;

pub use engine::{weather_changes, DispatchOutcome, HapticEngine, HapticsConfig};
pub use pattern::{HapticPattern, Pulse};
pub use patterns::UiAction;
pub use playback::{play_pattern, Actuator, PlaybackSink};
pub use rate_limit::{try_fire, HapticCategory, RateLimiter, RateLimiterState};
pub use sink::{with_fallback, HapticError, HapticSink, LogSink, NoopSink, RecordingSink};
