use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nimbus_gestures::sample::DEFAULT_DEADZONE_PX;
use nimbus_gestures::transition::DEFAULT_TRANSITION_MS;
use nimbus_gestures::{PullConfig, SwipeConfig};
use nimbus_haptics::HapticsConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Raw touch input
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// Pull-to-refresh tuning
    #[serde(default)]
    pub pull: PullConfig,

    /// Swipe navigation tuning
    #[serde(default)]
    pub swipe: SwipeConfig,

    /// Haptic feedback
    #[serde(default)]
    pub haptics: HapticsConfig,

    /// Screen order for swipe navigation
    #[serde(default)]
    pub screens: ScreensConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Disable to run without touch input
    #[serde(default = "default_touch_enabled")]
    pub touch_enabled: bool,

    /// Travel (px) before a controlled drag suppresses default scrolling
    #[serde(default = "default_deadzone_px")]
    pub deadzone_px: f64,
}

fn default_touch_enabled() -> bool {
    true
}

fn default_deadzone_px() -> f64 {
    DEFAULT_DEADZONE_PX
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            touch_enabled: default_touch_enabled(),
            deadzone_px: default_deadzone_px(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreensConfig {
    /// Screens in swipe order
    #[serde(default = "default_screen_order")]
    pub order: Vec<String>,

    /// Enter/exit animation length in milliseconds
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
}

fn default_screen_order() -> Vec<String> {
    vec!["current".to_string(), "hourly".to_string(), "daily".to_string()]
}

fn default_transition_ms() -> u64 {
    DEFAULT_TRANSITION_MS
}

impl Default for ScreensConfig {
    fn default() -> Self {
        Self {
            order: default_screen_order(),
            transition_ms: default_transition_ms(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nimbus")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            sampler: SamplerConfig::default(),
            pull: PullConfig::default(),
            swipe: SwipeConfig::default(),
            haptics: HapticsConfig::default(),
            screens: ScreensConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, creating default if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        Self::validated(Self::load()?)
    }

    fn validated(config: Self) -> Result<(Self, ValidationResult)> {
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        // Sampler
        if self.sampler.deadzone_px.is_nan() || self.sampler.deadzone_px < 0.0 {
            result.add_error("sampler.deadzone_px", "Deadzone must be zero or positive");
        }
        if !self.sampler.touch_enabled {
            result.add_warning("sampler.touch_enabled", "Touch input disabled - gestures are off");
        }

        // Pull-to-refresh
        if !is_positive(self.pull.threshold) {
            result.add_error("pull.threshold", "Threshold must be greater than 0");
        }
        validate_factor(self.pull.resistance, "pull.resistance", &mut result);
        validate_factor(self.pull.trigger_ratio, "pull.trigger_ratio", &mut result);
        if self.pull.cap_multiplier.is_nan() || self.pull.cap_multiplier < 1.0 {
            result.add_error(
                "pull.cap_multiplier",
                "Cap multiplier must be at least 1 so a full pull is reachable",
            );
        }

        // Swipe
        if !is_positive(self.swipe.min_distance) {
            result.add_error("swipe.min_distance", "Minimum distance must be greater than 0");
        }
        if !is_positive(self.swipe.max_vertical) {
            result.add_error("swipe.max_vertical", "Maximum vertical drift must be greater than 0");
        }
        if self.swipe.max_duration_ms == 0 {
            result.add_error("swipe.max_duration_ms", "Maximum duration must be greater than 0");
        }
        validate_factor(
            self.swipe.feedback_resistance,
            "swipe.feedback_resistance",
            &mut result,
        );
        if self.swipe.feedback_cap.is_nan() || self.swipe.feedback_cap < 0.0 {
            result.add_error("swipe.feedback_cap", "Feedback cap must be zero or positive");
        }

        // Haptics
        if !(0.0..=1.0).contains(&self.haptics.intensity) {
            result.add_error("haptics.intensity", "Intensity must be between 0 and 1");
        }
        if !self.haptics.enabled {
            result.add_warning("haptics.enabled", "Haptic feedback disabled");
        }
        for (field, cooldown) in [
            ("haptics.ui_cooldown_ms", self.haptics.ui_cooldown_ms),
            ("haptics.gesture_cooldown_ms", self.haptics.gesture_cooldown_ms),
        ] {
            if cooldown > 2000 {
                result.add_warning(field, "Cooldown is longer than 2 seconds");
            }
        }

        // Screens
        if self.screens.order.is_empty() {
            result.add_error("screens.order", "At least one screen is required");
        }
        for (i, screen) in self.screens.order.iter().enumerate() {
            if self.screens.order[..i].contains(screen) {
                result.add_error("screens.order", format!("Duplicate screen: {}", screen));
            }
        }

        result
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("nimbus");

        Ok(config_dir.join("config.toml"))
    }
}

fn is_positive(value: f64) -> bool {
    value > 0.0
}

/// Damping factors and ratios live in (0, 1].
fn validate_factor(value: f64, field_name: &str, result: &mut ValidationResult) {
    if !is_positive(value) || value > 1.0 {
        result.add_error(field_name, format!("Must be in (0, 1], got {}", value));
    }
}
