//! Pattern families keyed by semantic event.
//!
//! Every function here is pure. `intensity` is the caller's multiplier in
//! `[0, 1]`, applied on top of each family's own shape.

use nimbus_weather::{Severity, WeatherBucket, WeatherCondition};
use serde::{Deserialize, Serialize};

use crate::pattern::HapticPattern;
use crate::rate_limit::HapticCategory;

/// Minimum absolute temperature change (degrees) that is felt.
pub const TEMPERATURE_THRESHOLD: f64 = 3.0;
/// Temperature change at which the pulse reaches full strength.
pub const TEMPERATURE_FULL_SCALE: f64 = 20.0;
/// Minimum absolute pressure change (hPa) that is felt.
pub const PRESSURE_THRESHOLD: f64 = 5.0;
/// Minimum wind speed increase (km/h) that counts as a gust.
pub const WIND_GUST_THRESHOLD: f64 = 10.0;
/// Silence between the exit and entry halves of a transition.
pub const TRANSITION_GAP_MS: u32 = 150;
/// Slack for readings such as `4.1 - 1.1` landing just under a threshold.
const THRESHOLD_EPSILON: f64 = 1e-9;

/// `value >= threshold`, tolerating float subtraction error. NaN never reaches.
fn reaches(value: f64, threshold: f64) -> bool {
    value + THRESHOLD_EPSILON >= threshold
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiAction {
    ButtonPress,
    Selection,
    Success,
    Error,
    /// Pull passed the point where releasing refreshes.
    Ready,
    /// A swipe navigated somewhere.
    Swipe,
}

impl UiAction {
    /// Rate-limit bucket. Gesture feedback must not starve button taps.
    pub fn category(&self) -> HapticCategory {
        match self {
            Self::Ready | Self::Swipe => HapticCategory::Gesture,
            Self::ButtonPress | Self::Selection | Self::Success | Self::Error => HapticCategory::Ui,
        }
    }
}

pub fn ui_action(action: UiAction) -> HapticPattern {
    match action {
        UiAction::ButtonPress => HapticPattern::single(10, 0.5),
        UiAction::Selection => HapticPattern::single(15, 0.3),
        UiAction::Success => HapticPattern::ramp(2, 30, 50, 0.6, 0.8),
        UiAction::Error => HapticPattern::train(3, 50, 40, 0.9),
        UiAction::Ready => HapticPattern::single(20, 0.6),
        UiAction::Swipe => HapticPattern::single(12, 0.4),
    }
}

/// Unscaled shape for a weather bucket.
pub fn weather_bucket(bucket: WeatherBucket) -> HapticPattern {
    match bucket {
        WeatherBucket::Clear => HapticPattern::single(40, 0.4),
        WeatherBucket::Cloudy => HapticPattern::train(2, 60, 80, 0.5),
        // Drizzle on glass: many faint taps.
        WeatherBucket::Rain => HapticPattern::train(8, 30, 40, 0.3),
        WeatherBucket::Snow => HapticPattern::train(4, 80, 120, 0.2),
        // Three sharp strikes, each weaker than the last.
        WeatherBucket::Thunderstorm => HapticPattern::ramp(3, 50, 60, 1.0, 0.4),
        WeatherBucket::Fog => HapticPattern::single(300, 0.15),
    }
}

pub fn weather_code(code: i32, intensity: f32) -> HapticPattern {
    weather_bucket(WeatherCondition::from_wmo_code(code).bucket()).scaled(intensity)
}

/// Building ramp announcing a severity tier.
pub fn severity_entry(severity: Severity) -> HapticPattern {
    match severity {
        Severity::Light => HapticPattern::ramp(2, 40, 40, 0.2, 0.4),
        Severity::Moderate => HapticPattern::ramp(3, 40, 40, 0.3, 0.7),
        Severity::Severe => HapticPattern::ramp(4, 40, 40, 0.5, 1.0),
    }
}

/// Fading ramp leaving a severity tier.
pub fn severity_exit(severity: Severity) -> HapticPattern {
    match severity {
        Severity::Light => HapticPattern::ramp(2, 40, 40, 0.4, 0.2),
        Severity::Moderate => HapticPattern::ramp(3, 40, 40, 0.7, 0.3),
        Severity::Severe => HapticPattern::ramp(4, 40, 40, 1.0, 0.5),
    }
}

pub fn weather_transition(from: Severity, to: Severity, intensity: f32) -> HapticPattern {
    severity_exit(from)
        .then(&severity_entry(to), TRANSITION_GAP_MS)
        .scaled(intensity)
}

pub fn temperature_change(delta: f64, intensity: f32) -> Option<HapticPattern> {
    let magnitude = delta.abs();
    if !reaches(magnitude, TEMPERATURE_THRESHOLD) {
        return None;
    }

    let strength = (magnitude / TEMPERATURE_FULL_SCALE).min(1.) as f32;
    Some(HapticPattern::single(120, strength * intensity))
}

pub fn pressure_change(delta: f64, intensity: f32) -> Option<HapticPattern> {
    if !reaches(delta.abs(), PRESSURE_THRESHOLD) {
        return None;
    }

    let ramp = if delta > 0. {
        HapticPattern::ramp(4, 60, 40, 0.2, 0.8)
    } else {
        HapticPattern::ramp(4, 60, 40, 0.8, 0.2)
    };
    Some(ramp.scaled(intensity))
}

pub fn wind_gust(delta: f64, intensity: f32) -> Option<HapticPattern> {
    if !reaches(delta, WIND_GUST_THRESHOLD) {
        return None;
    }

    Some(HapticPattern::train(3, 30, 30, 0.7).scaled(intensity))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUCKETS: [WeatherBucket; 6] = [
        WeatherBucket::Clear,
        WeatherBucket::Cloudy,
        WeatherBucket::Rain,
        WeatherBucket::Snow,
        WeatherBucket::Thunderstorm,
        WeatherBucket::Fog,
    ];

    #[test]
    fn test_weather_buckets_are_distinguishable() {
        for (i, a) in BUCKETS.iter().enumerate() {
            for b in &BUCKETS[i + 1..] {
                assert_ne!(weather_bucket(*a), weather_bucket(*b), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_thunderstorm_decays() {
        let storm = weather_code(95, 1.0);
        let audible: Vec<f32> = storm
            .pulses()
            .iter()
            .filter(|p| !p.is_silent())
            .map(|p| p.intensity)
            .collect();
        assert_eq!(audible.len(), 3);
        assert!(audible[0] > audible[1] && audible[1] > audible[2]);
    }

    #[test]
    fn test_rain_is_long_and_soft() {
        let rain = weather_code(63, 1.0);
        assert!(rain.pulse_count() >= 6);
        assert!(rain.peak_intensity() <= 0.3 + f32::EPSILON);
    }

    #[test]
    fn test_weather_code_scales_intensity() {
        let full = weather_code(0, 1.0);
        let half = weather_code(0, 0.5);
        assert!((half.peak_intensity() - full.peak_intensity() / 2.).abs() < 1e-6);
    }

    #[test]
    fn test_transition_is_exit_then_entry() {
        let t = weather_transition(Severity::Light, Severity::Severe, 1.0);
        assert_eq!(
            t.pulse_count(),
            severity_exit(Severity::Light).pulse_count()
                + severity_entry(Severity::Severe).pulse_count()
        );
        assert!(t.pulses().contains(&crate::pattern::Pulse::gap(TRANSITION_GAP_MS)));
    }

    #[test]
    fn test_temperature_threshold() {
        assert!(temperature_change(2.9, 1.0).is_none());
        assert!(temperature_change(-2.9, 1.0).is_none());

        let exactly = temperature_change(3.0, 1.0).unwrap();
        assert_eq!(exactly.pulse_count(), 1);
        assert!(temperature_change(-3.0, 1.0).is_some());
    }

    #[test]
    fn test_temperature_strength_scales_and_saturates() {
        let small = temperature_change(5.0, 1.0).unwrap();
        assert!((small.peak_intensity() - 0.25).abs() < 1e-6);

        let huge = temperature_change(45.0, 1.0).unwrap();
        assert_eq!(huge.peak_intensity(), 1.0);
    }

    #[test]
    fn test_pressure_direction_selects_ramp() {
        assert!(pressure_change(4.9, 1.0).is_none());

        let rising = pressure_change(6.0, 1.0).unwrap();
        let falling = pressure_change(-6.0, 1.0).unwrap();
        let first = |p: &HapticPattern| p.pulses()[0].intensity;
        let last = |p: &HapticPattern| p.pulses()[p.pulses().len() - 1].intensity;

        assert!(first(&rising) < last(&rising));
        assert!(first(&falling) > last(&falling));
    }

    #[test]
    fn test_wind_gust_only_on_increase() {
        assert!(wind_gust(9.9, 1.0).is_none());
        assert!(wind_gust(-15.0, 1.0).is_none());
        assert_eq!(wind_gust(10.0, 1.0).unwrap().pulse_count(), 3);
    }

    #[test]
    fn test_threshold_tolerates_float_noise() {
        assert!(4.1 - 1.1 < TEMPERATURE_THRESHOLD);
        assert!(temperature_change(4.1 - 1.1, 1.0).is_some());
        assert!(pressure_change(1024.1 - 1019.1, 1.0).is_some());
        assert!(pressure_change(1019.1 - 1024.1, 1.0).is_some());
        assert!(wind_gust(30.3 - 20.3, 1.0).is_some());
    }

    #[test]
    fn test_nan_deltas_fire_nothing() {
        assert!(temperature_change(f64::NAN, 1.0).is_none());
        assert!(pressure_change(f64::NAN, 1.0).is_none());
        assert!(wind_gust(f64::NAN, 1.0).is_none());
    }

    #[test]
    fn test_ui_actions_are_fixed_and_categorized() {
        assert_eq!(ui_action(UiAction::ButtonPress), ui_action(UiAction::ButtonPress));
        assert_ne!(ui_action(UiAction::Success), ui_action(UiAction::Error));
        assert_eq!(UiAction::Ready.category(), HapticCategory::Gesture);
        assert_eq!(UiAction::Error.category(), HapticCategory::Ui);
    }
}
