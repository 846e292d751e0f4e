//! Gesture-specific error types.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GestureError {
    #[error("No screens configured")]
    NoScreens,

    #[error("Duplicate screen: {0}")]
    DuplicateScreen(String),

    #[error("Unknown screen: {0}")]
    UnknownScreen(String),
}

impl GestureError {
    pub fn user_message(&self) -> &'static str {
        match self {
            GestureError::NoScreens => "No screens to navigate. Check your settings.",
            GestureError::DuplicateScreen(_) => "A screen is listed twice. Check your settings.",
            GestureError::UnknownScreen(_) => "That screen does not exist.",
        }
    }
}
