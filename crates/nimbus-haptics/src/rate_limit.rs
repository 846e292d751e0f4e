//! Cooldown gating for actuator dispatch.
//!
//! Drops the newest request when inside the cooldown; nothing is ever queued.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticCategory {
    Ui,
    Gesture,
    Weather,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterState {
    pub last_fired_at: Option<Duration>,
    pub cooldown: Duration,
}

impl RateLimiterState {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            last_fired_at: None,
            cooldown,
        }
    }
}

/// Decides whether a dispatch at `now` may fire.
///
/// Only an allowed dispatch moves `last_fired_at`; a dropped one leaves the
/// state untouched so a steady stream cannot keep the window shut forever.
pub fn try_fire(state: RateLimiterState, now: Duration) -> (bool, RateLimiterState) {
    let allowed = match state.last_fired_at {
        None => true,
        Some(last) => now >= last && now - last >= state.cooldown,
    };

    if allowed {
        (
            true,
            RateLimiterState {
                last_fired_at: Some(now),
                ..state
            },
        )
    } else {
        (false, state)
    }
}

/// One [`RateLimiterState`] per category.
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    states: HashMap<HapticCategory, RateLimiterState>,
}

impl RateLimiter {
    pub fn new(cooldowns: impl IntoIterator<Item = (HapticCategory, Duration)>) -> Self {
        Self {
            states: cooldowns
                .into_iter()
                .map(|(category, cooldown)| (category, RateLimiterState::new(cooldown)))
                .collect(),
        }
    }

    /// Categories without a configured cooldown are never limited.
    pub fn try_fire(&mut self, category: HapticCategory, now: Duration) -> bool {
        let Some(state) = self.states.get_mut(&category) else {
            return true;
        };

        let (allowed, next) = try_fire(*state, now);
        *state = next;
        allowed
    }

    pub fn state(&self, category: HapticCategory) -> Option<RateLimiterState> {
        self.states.get(&category).copied()
    }
}
