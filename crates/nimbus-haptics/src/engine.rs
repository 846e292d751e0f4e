//! Rate-limited dispatch of haptic patterns.

use std::time::Duration;

use nimbus_weather::WeatherHapticContext;
use serde::{Deserialize, Serialize};

use crate::pattern::HapticPattern;
use crate::patterns::{self, UiAction};
use crate::rate_limit::{HapticCategory, RateLimiter};
use crate::sink::{with_fallback, HapticSink};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HapticsConfig {
    /// Master switch
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// User intensity preference in [0, 1]
    #[serde(default = "default_intensity")]
    pub intensity: f32,

    #[serde(default = "default_ui_cooldown_ms")]
    pub ui_cooldown_ms: u64,

    #[serde(default = "default_gesture_cooldown_ms")]
    pub gesture_cooldown_ms: u64,

    #[serde(default = "default_weather_cooldown_ms")]
    pub weather_cooldown_ms: u64,

    /// Silence between patterns fired by the same weather update
    #[serde(default = "default_sequence_gap_ms")]
    pub sequence_gap_ms: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_intensity() -> f32 {
    1.0
}

fn default_ui_cooldown_ms() -> u64 {
    150
}

fn default_gesture_cooldown_ms() -> u64 {
    150
}

fn default_weather_cooldown_ms() -> u64 {
    1000
}

fn default_sequence_gap_ms() -> u32 {
    200
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            intensity: default_intensity(),
            ui_cooldown_ms: default_ui_cooldown_ms(),
            gesture_cooldown_ms: default_gesture_cooldown_ms(),
            weather_cooldown_ms: default_weather_cooldown_ms(),
            sequence_gap_ms: default_sequence_gap_ms(),
        }
    }
}

impl HapticsConfig {
    pub fn cooldowns(&self) -> [(HapticCategory, Duration); 3] {
        [
            (HapticCategory::Ui, Duration::from_millis(self.ui_cooldown_ms)),
            (
                HapticCategory::Gesture,
                Duration::from_millis(self.gesture_cooldown_ms),
            ),
            (
                HapticCategory::Weather,
                Duration::from_millis(self.weather_cooldown_ms),
            ),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Played,
    RateLimited,
    Disabled,
    /// The platform has no vibration actuator.
    Unsupported,
    /// Nothing audible to play.
    Empty,
}

/// Every pattern a weather update should produce, in play order.
///
/// The first reading plays the condition itself. Later readings play a
/// transition when the condition bucket changes, followed by any
/// temperature, pressure, or wind patterns whose thresholds were crossed.
pub fn weather_changes(
    previous: Option<&WeatherHapticContext>,
    current: &WeatherHapticContext,
    intensity: f32,
) -> Vec<HapticPattern> {
    let Some(previous) = previous else {
        return vec![patterns::weather_code(current.code, intensity)];
    };

    let delta = current.delta_from(previous);
    let mut out = Vec::new();

    if delta.condition_changed {
        out.push(patterns::weather_transition(
            previous.severity,
            current.severity,
            intensity,
        ));
        out.push(patterns::weather_code(current.code, intensity));
    }

    out.extend(patterns::temperature_change(delta.temperature, intensity));
    out.extend(patterns::pressure_change(delta.pressure, intensity));
    out.extend(patterns::wind_gust(delta.wind_speed, intensity));

    out
}

pub struct HapticEngine {
    config: HapticsConfig,
    sink: Box<dyn HapticSink>,
    supported: bool,
    limiter: RateLimiter,
    last_weather: Option<WeatherHapticContext>,
}

impl std::fmt::Debug for HapticEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HapticEngine")
            .field("config", &self.config)
            .field("supported", &self.supported)
            .field("limiter", &self.limiter)
            .field("last_weather", &self.last_weather)
            .finish()
    }
}

impl HapticEngine {
    pub fn new(config: HapticsConfig, sink: Box<dyn HapticSink>) -> Self {
        let limiter = RateLimiter::new(config.cooldowns());
        let supported = sink.is_supported();
        Self {
            config,
            sink: with_fallback(sink),
            supported,
            limiter,
            last_weather: None,
        }
    }

    /// False when the sink was swapped for a no-op at construction.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn config(&self) -> &HapticsConfig {
        &self.config
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.config.intensity = intensity.clamp(0., 1.);
    }

    pub fn last_weather(&self) -> Option<&WeatherHapticContext> {
        self.last_weather.as_ref()
    }

    /// Sends `pattern` to the sink unless disabled, empty, or rate limited.
    pub fn dispatch(
        &mut self,
        category: HapticCategory,
        pattern: &HapticPattern,
        now: Duration,
    ) -> DispatchOutcome {
        if !self.config.enabled {
            return DispatchOutcome::Disabled;
        }
        if !self.supported {
            return DispatchOutcome::Unsupported;
        }
        if pattern.is_empty() {
            return DispatchOutcome::Empty;
        }
        if !self.limiter.try_fire(category, now) {
            tracing::trace!(?category, "Haptic dropped inside cooldown");
            return DispatchOutcome::RateLimited;
        }

        if let Err(e) = self.sink.vibrate(pattern) {
            tracing::warn!("Haptic sink error: {}", e);
        }
        DispatchOutcome::Played
    }

    pub fn ui_action(&mut self, action: UiAction, now: Duration) -> DispatchOutcome {
        let pattern = patterns::ui_action(action).scaled(self.config.intensity);
        self.dispatch(action.category(), &pattern, now)
    }

    /// Diffs `context` against the previous update and plays what changed as
    /// one timeline.
    ///
    /// The stored reading always advances, even when the dispatch is dropped.
    pub fn weather_update(
        &mut self,
        context: WeatherHapticContext,
        now: Duration,
    ) -> DispatchOutcome {
        let intensity = self.intensity_for(&context);
        let changes = weather_changes(self.last_weather.as_ref(), &context, intensity);
        self.last_weather = Some(context);

        if changes.is_empty() {
            return DispatchOutcome::Empty;
        }

        tracing::debug!(patterns = changes.len(), "Weather update haptics");
        let timeline = HapticPattern::sequence(changes, self.config.sequence_gap_ms);
        self.dispatch(HapticCategory::Weather, &timeline, now)
    }

    fn intensity_for(&self, context: &WeatherHapticContext) -> f32 {
        (self.config.intensity * context.intensity_scale()).clamp(0., 1.)
    }
}
