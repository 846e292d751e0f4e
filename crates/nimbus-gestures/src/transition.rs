//! Enter/exit choreography between ordered screens.

use std::time::Duration;

use serde::Serialize;

use crate::error::GestureError;
use crate::swipe::SwipeDirection;

pub const DEFAULT_TRANSITION_MS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavDirection {
    Forward,
    Backward,
}

impl From<SwipeDirection> for NavDirection {
    /// Content follows the finger: swiping left reveals the next screen.
    fn from(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Left => Self::Forward,
            SwipeDirection::Right => Self::Backward,
        }
    }
}

/// Horizontal translation of one screen, in percent of the viewport width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenFrame {
    pub screen: String,
    pub from_x: f32,
    pub to_x: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenTransition {
    pub direction: NavDirection,
    pub entering: ScreenFrame,
    pub exiting: ScreenFrame,
    pub duration: Duration,
}

#[derive(Debug)]
pub struct ScreenTransitionChoreographer {
    screens: Vec<String>,
    current: usize,
    previous: Option<usize>,
    duration: Duration,
}

impl ScreenTransitionChoreographer {
    pub fn new(screens: Vec<String>, duration: Duration) -> Result<Self, GestureError> {
        if screens.is_empty() {
            return Err(GestureError::NoScreens);
        }
        for (i, screen) in screens.iter().enumerate() {
            if screens[..i].contains(screen) {
                return Err(GestureError::DuplicateScreen(screen.clone()));
            }
        }

        Ok(Self {
            screens,
            current: 0,
            previous: None,
            duration,
        })
    }

    pub fn current(&self) -> &str {
        &self.screens[self.current]
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.map(|i| self.screens[i].as_str())
    }

    /// Navigates to `screen`, deriving the direction from screen order.
    ///
    /// Returns `Ok(None)` when `screen` is already current.
    pub fn show(&mut self, screen: &str) -> Result<Option<ScreenTransition>, GestureError> {
        let target = self
            .screens
            .iter()
            .position(|s| s == screen)
            .ok_or_else(|| GestureError::UnknownScreen(screen.to_string()))?;

        if target == self.current {
            return Ok(None);
        }

        let direction = if target > self.current {
            NavDirection::Forward
        } else {
            NavDirection::Backward
        };
        Ok(Some(self.move_to(target, direction)))
    }

    /// Navigates one screen in the direction of a detected swipe.
    ///
    /// Swiping past either end of the list does nothing.
    pub fn on_swipe(&mut self, swipe: SwipeDirection) -> Option<ScreenTransition> {
        let direction = NavDirection::from(swipe);
        let target = match direction {
            NavDirection::Forward => self.current + 1,
            NavDirection::Backward => self.current.checked_sub(1)?,
        };
        if target >= self.screens.len() {
            return None;
        }

        Some(self.move_to(target, direction))
    }

    fn move_to(&mut self, target: usize, direction: NavDirection) -> ScreenTransition {
        let sign = match direction {
            NavDirection::Forward => 1.,
            NavDirection::Backward => -1.,
        };

        let transition = ScreenTransition {
            direction,
            entering: ScreenFrame {
                screen: self.screens[target].clone(),
                from_x: 100. * sign,
                to_x: 0.,
            },
            exiting: ScreenFrame {
                screen: self.screens[self.current].clone(),
                from_x: 0.,
                to_x: -100. * sign,
            },
            duration: self.duration,
        };

        tracing::debug!(
            from = %transition.exiting.screen,
            to = %transition.entering.screen,
            ?direction,
            "Screen transition"
        );

        self.previous = Some(self.current);
        self.current = target;
        transition
    }
}
