//! Centralized error types for Nimbus.
//!
//! Each crate keeps its own error enum; this module gathers them under one
//! [`AppError`] so the application layer can surface a single
//! `user_message()` regardless of where a failure started.

use nimbus_gestures::GestureError;
use nimbus_haptics::HapticError;
use nimbus_weather::SnapshotError;
use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a message that is safe to show in the UI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gesture error: {0}")]
    Gesture(#[from] GestureError),

    #[error("Haptic error: {0}")]
    Haptic(#[from] HapticError),

    #[error("Weather data error: {0}")]
    Weather(#[from] SnapshotError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Gesture(e) => e.user_message(),
            AppError::Haptic(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}
