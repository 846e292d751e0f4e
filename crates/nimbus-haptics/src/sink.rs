//! Capability-abstracted vibration output.
//!
//! The engine only ever talks to a [`HapticSink`]. Platform detection happens
//! once, in [`with_fallback`], which swaps an unsupported sink for
//! [`NoopSink`].

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::pattern::HapticPattern;

#[derive(Debug, Error)]
pub enum HapticError {
    #[error("Vibration actuator unavailable")]
    Unavailable,

    #[error("Actuator write failed: {0}")]
    WriteFailed(String),

    #[error("Playback task stopped")]
    PlaybackStopped,
}

impl HapticError {
    pub fn user_message(&self) -> &'static str {
        match self {
            HapticError::Unavailable => "Vibration is not available on this device.",
            HapticError::WriteFailed(_) | HapticError::PlaybackStopped => {
                "Haptic feedback stopped working. Try restarting the app."
            }
        }
    }
}

pub trait HapticSink: Send {
    /// Whether the platform exposes a vibration capability at all.
    fn is_supported(&self) -> bool {
        true
    }

    fn vibrate(&mut self, pattern: &HapticPattern) -> Result<(), HapticError>;
}

/// Substitutes [`NoopSink`] when `candidate` cannot vibrate.
pub fn with_fallback(candidate: Box<dyn HapticSink>) -> Box<dyn HapticSink> {
    if candidate.is_supported() {
        candidate
    } else {
        tracing::info!("Vibration not supported, haptic feedback disabled");
        Box::new(NoopSink)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl HapticSink for NoopSink {
    fn vibrate(&mut self, _pattern: &HapticPattern) -> Result<(), HapticError> {
        Ok(())
    }
}

/// Logs each pattern as the on/off list a platform vibrate call would get.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl HapticSink for LogSink {
    fn vibrate(&mut self, pattern: &HapticPattern) -> Result<(), HapticError> {
        tracing::info!(
            sequence = ?pattern.to_vibration_sequence(),
            peak = pattern.peak_intensity(),
            "vibrate"
        );
        Ok(())
    }
}

/// Keeps every pattern it receives. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    played: Arc<Mutex<Vec<HapticPattern>>>,
    unsupported: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that reports no vibration capability.
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    pub fn played(&self) -> Vec<HapticPattern> {
        self.played.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.played.lock().len()
    }

    pub fn clear(&self) {
        self.played.lock().clear();
    }
}

impl HapticSink for RecordingSink {
    fn is_supported(&self) -> bool {
        !self.unsupported
    }

    fn vibrate(&mut self, pattern: &HapticPattern) -> Result<(), HapticError> {
        if self.unsupported {
            return Err(HapticError::Unavailable);
        }
        self.played.lock().push(pattern.clone());
        Ok(())
    }
}
