use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use nimbus_gestures::ScrollPosition;
use nimbus_haptics::HapticSink;

use crate::{AppError, Config, Interaction};

/// Main application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
    started: Instant,
}

impl App {
    /// Create a new application instance from the validated on-disk config
    pub fn new() -> Result<Self> {
        let (config, _warnings) = Config::load_validated()?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            started: Instant::now(),
        }
    }

    /// Build the interaction pipeline for one screen stack
    pub fn interaction(
        &self,
        scroll: Arc<dyn ScrollPosition>,
        sink: Box<dyn HapticSink>,
    ) -> Result<Interaction, AppError> {
        tracing::debug!(
            screens = self.config.screens.order.len(),
            haptics = self.config.haptics.enabled,
            "Building interaction pipeline"
        );
        Interaction::new(&self.config, scroll, sink)
    }

    /// Monotonic time since startup, the clock every timestamp is measured on
    pub fn now(&self) -> Duration {
        self.started.elapsed()
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down after {:?}", self.now());
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use nimbus_haptics::NoopSink;

    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let app = App::with_config(Config::default());
        let a = app.now();
        let b = app.now();
        assert!(b >= a);
    }

    #[test]
    fn test_bad_screen_config_surfaces_as_app_error() {
        let mut config = Config::default();
        config.screens.order.clear();
        let app = App::with_config(config);

        let err = app
            .interaction(Arc::new(|| true), Box::new(NoopSink))
            .unwrap_err();
        assert!(matches!(err, AppError::Gesture(_)));
    }
}
