//! Haptic-facing view of the current weather.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::types::{Severity, TimeOfDay, WeatherCondition, WeatherDelta, WeatherSnapshot};

/// Wind speed (km/h) at which any condition is treated as severe.
pub const SEVERE_WIND_KMH: f64 = 60.0;

/// Context derived from a snapshot each time weather data changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherHapticContext {
    pub code: i32,
    pub temperature: f64,
    pub wind_speed: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub time_of_day: TimeOfDay,
    pub severity: Severity,
}

impl WeatherHapticContext {
    pub fn from_snapshot(snapshot: &WeatherSnapshot, local_time: NaiveTime) -> Self {
        let mut severity = snapshot.condition().severity();
        if snapshot.wind_speed >= SEVERE_WIND_KMH {
            severity = Severity::Severe;
        }

        Self {
            code: snapshot.code,
            temperature: snapshot.temperature,
            wind_speed: snapshot.wind_speed,
            humidity: snapshot.humidity,
            pressure: snapshot.pressure,
            time_of_day: TimeOfDay::from_time(local_time),
            severity,
        }
    }

    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_wmo_code(self.code)
    }

    /// Signed change from `previous` to `self`.
    pub fn delta_from(&self, previous: &WeatherHapticContext) -> WeatherDelta {
        WeatherDelta {
            temperature: self.temperature - previous.temperature,
            pressure: self.pressure - previous.pressure,
            wind_speed: self.wind_speed - previous.wind_speed,
            condition_changed: self.condition().bucket() != previous.condition().bucket(),
        }
    }

    /// Multiplier applied on top of the user's intensity setting.
    ///
    /// Night softens everything; severe weather is felt harder.
    pub fn intensity_scale(&self) -> f32 {
        let time = match self.time_of_day {
            TimeOfDay::Night => 0.6,
            TimeOfDay::Evening => 0.85,
            TimeOfDay::Morning | TimeOfDay::Afternoon => 1.0,
        };
        let severity = match self.severity {
            Severity::Light => 0.8,
            Severity::Moderate => 1.0,
            Severity::Severe => 1.2,
        };
        time * severity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    fn snapshot(code: i32, wind_speed: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            code,
            temperature: 18.0,
            wind_speed,
            humidity: 60.0,
            pressure: 1010.0,
        }
    }

    #[test]
    fn test_severity_follows_condition() {
        let ctx = WeatherHapticContext::from_snapshot(&snapshot(63, 5.0), noon());
        assert_eq!(ctx.severity, Severity::Moderate);
        assert_eq!(ctx.condition(), WeatherCondition::Rain);
    }

    #[test]
    fn test_strong_wind_escalates_to_severe() {
        let ctx = WeatherHapticContext::from_snapshot(&snapshot(0, 65.0), noon());
        assert_eq!(ctx.severity, Severity::Severe);
    }

    #[test]
    fn test_delta_from_previous() {
        let before = WeatherHapticContext::from_snapshot(&snapshot(0, 5.0), noon());
        let after = WeatherHapticContext::from_snapshot(&snapshot(61, 25.0), noon());
        let delta = after.delta_from(&before);
        assert_eq!(delta.wind_speed, 20.0);
        assert_eq!(delta.temperature, 0.0);
        assert!(delta.condition_changed);
    }

    #[test]
    fn test_delta_same_bucket_is_not_a_change() {
        let before = WeatherHapticContext::from_snapshot(&snapshot(1, 5.0), noon());
        let after = WeatherHapticContext::from_snapshot(&snapshot(3, 5.0), noon());
        assert!(!after.delta_from(&before).condition_changed);
    }

    #[test]
    fn test_night_is_softer_than_day() {
        let midnight = NaiveTime::from_hms_opt(0, 30, 0).unwrap();
        let day = WeatherHapticContext::from_snapshot(&snapshot(63, 5.0), noon());
        let night = WeatherHapticContext::from_snapshot(&snapshot(63, 5.0), midnight);
        assert_eq!(night.time_of_day, TimeOfDay::Night);
        assert!(night.intensity_scale() < day.intensity_scale());
    }
}
