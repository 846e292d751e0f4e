//! Timed playback of patterns on an intensity-controlled actuator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::pattern::HapticPattern;
use crate::sink::{HapticError, HapticSink};

/// A motor that can be driven at a given strength.
pub trait Actuator: Send + 'static {
    fn set_intensity(&mut self, intensity: f32) -> Result<(), HapticError>;
}

/// Plays `pattern` pulse by pulse and always leaves the actuator off.
pub async fn play_pattern<A: Actuator>(
    pattern: &HapticPattern,
    actuator: &mut A,
) -> Result<(), HapticError> {
    let mut result = Ok(());
    for pulse in pattern.pulses() {
        if let Err(e) = actuator.set_intensity(pulse.intensity) {
            result = Err(e);
            break;
        }
        tokio::time::sleep(Duration::from_millis(u64::from(pulse.duration_ms))).await;
    }

    let off = actuator.set_intensity(0.);
    result.and(off)
}

/// Sink that hands patterns to a background task which plays them on the
/// actuator.
///
/// A pattern that arrives while another one is still playing is dropped, never
/// queued behind it.
#[derive(Debug, Clone)]
pub struct PlaybackSink {
    tx: mpsc::Sender<HapticPattern>,
    busy: Arc<AtomicBool>,
}

impl PlaybackSink {
    /// Spawns the playback task on the current tokio runtime.
    pub fn spawn<A: Actuator>(mut actuator: A) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<HapticPattern>(1);
        let busy = Arc::new(AtomicBool::new(false));
        let playing = busy.clone();

        let handle = tokio::spawn(async move {
            while let Some(pattern) = rx.recv().await {
                playing.store(true, Ordering::Release);
                if let Err(e) = play_pattern(&pattern, &mut actuator).await {
                    tracing::warn!("Haptic playback failed: {}", e);
                }
                playing.store(false, Ordering::Release);
            }
            tracing::debug!("Haptic playback task finished");
        });

        (Self { tx, busy }, handle)
    }

    /// Whether the actuator is in the middle of a pattern.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl HapticSink for PlaybackSink {
    fn vibrate(&mut self, pattern: &HapticPattern) -> Result<(), HapticError> {
        if self.is_busy() {
            tracing::trace!("Actuator busy, dropping haptic pattern");
            return Ok(());
        }

        match self.tx.try_send(pattern.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Pattern already pending, dropping haptic pattern");
                Ok(())
            }
            Err(TrySendError::Closed(_)) => Err(HapticError::PlaybackStopped),
        }
    }
}
