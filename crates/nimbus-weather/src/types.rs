use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::Sleet, // Freezing drizzle
            61 | 63 | 80 => Self::Rain,
            65 | 81 | 82 => Self::HeavyRain,
            66 | 67 => Self::Sleet, // Freezing rain
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Clear, // Unknown codes default to clear
        }
    }

    /// Coarse bucket used to pick a haptic shape.
    pub fn bucket(&self) -> WeatherBucket {
        match self {
            Self::Clear => WeatherBucket::Clear,
            Self::PartlyCloudy | Self::Cloudy => WeatherBucket::Cloudy,
            Self::Fog => WeatherBucket::Fog,
            Self::Drizzle | Self::Rain | Self::HeavyRain => WeatherBucket::Rain,
            Self::Snow | Self::Sleet => WeatherBucket::Snow,
            Self::Thunderstorm => WeatherBucket::Thunderstorm,
        }
    }

    /// Severity tier of the condition on its own, ignoring wind.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Clear | Self::PartlyCloudy | Self::Cloudy | Self::Fog => Severity::Light,
            Self::Drizzle | Self::Rain | Self::Snow | Self::Sleet => Severity::Moderate,
            Self::HeavyRain | Self::Thunderstorm => Severity::Severe,
        }
    }
}

/// Buckets that map one-to-one onto distinct haptic shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherBucket {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Thunderstorm,
    Fog,
}

/// How rough the weather is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Light,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn from_time(time: NaiveTime) -> Self {
        match time.hour() {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }
}

/// Point-in-time weather reading pushed by the forecast screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// WMO weather code
    pub code: i32,
    /// Temperature in degrees
    pub temperature: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Surface pressure in hPa
    pub pressure: f64,
}

impl WeatherSnapshot {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_wmo_code(self.code)
    }

    /// Reject readings a broken upstream transform could produce.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let fields = [
            ("temperature", self.temperature),
            ("wind_speed", self.wind_speed),
            ("humidity", self.humidity),
            ("pressure", self.pressure),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(SnapshotError::NotFinite(field));
            }
        }
        if self.wind_speed < 0.0 {
            return Err(SnapshotError::OutOfRange {
                field: "wind_speed",
                value: self.wind_speed,
            });
        }
        if !(0.0..=100.0).contains(&self.humidity) {
            return Err(SnapshotError::OutOfRange {
                field: "humidity",
                value: self.humidity,
            });
        }
        Ok(())
    }
}

/// Difference between two consecutive readings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherDelta {
    pub temperature: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub condition_changed: bool,
}

/// Snapshot validation errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SnapshotError {
    #[error("{0} is not a finite number")]
    NotFinite(&'static str),
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

impl SnapshotError {
    pub fn user_message(&self) -> &'static str {
        "Received weather data that could not be used."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(code: i32, temperature: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            code,
            temperature,
            wind_speed: 10.0,
            humidity: 50.0,
            pressure: 1013.0,
        }
    }

    #[test]
    fn test_wmo_code_clear() {
        assert_eq!(WeatherCondition::from_wmo_code(0), WeatherCondition::Clear);
    }

    #[test]
    fn test_wmo_code_partly_cloudy() {
        assert_eq!(WeatherCondition::from_wmo_code(1), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_wmo_code(2), WeatherCondition::PartlyCloudy);
    }

    #[test]
    fn test_wmo_code_fog() {
        assert_eq!(WeatherCondition::from_wmo_code(45), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_wmo_code(48), WeatherCondition::Fog);
    }

    #[test]
    fn test_wmo_code_rain_family() {
        assert_eq!(WeatherCondition::from_wmo_code(53), WeatherCondition::Drizzle);
        assert_eq!(WeatherCondition::from_wmo_code(63), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_wmo_code(82), WeatherCondition::HeavyRain);
    }

    #[test]
    fn test_wmo_code_snow_and_sleet() {
        assert_eq!(WeatherCondition::from_wmo_code(75), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_wmo_code(86), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_wmo_code(57), WeatherCondition::Sleet);
        assert_eq!(WeatherCondition::from_wmo_code(67), WeatherCondition::Sleet);
    }

    #[test]
    fn test_wmo_code_thunderstorm() {
        assert_eq!(WeatherCondition::from_wmo_code(95), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_wmo_code(99), WeatherCondition::Thunderstorm);
    }

    #[test]
    fn test_wmo_code_unknown_defaults_to_clear() {
        assert_eq!(WeatherCondition::from_wmo_code(999), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_wmo_code(-1), WeatherCondition::Clear);
    }

    #[test]
    fn test_buckets_cover_six_shapes() {
        assert_eq!(WeatherCondition::Clear.bucket(), WeatherBucket::Clear);
        assert_eq!(WeatherCondition::PartlyCloudy.bucket(), WeatherBucket::Cloudy);
        assert_eq!(WeatherCondition::Drizzle.bucket(), WeatherBucket::Rain);
        assert_eq!(WeatherCondition::Sleet.bucket(), WeatherBucket::Snow);
        assert_eq!(WeatherCondition::Fog.bucket(), WeatherBucket::Fog);
        assert_eq!(WeatherCondition::Thunderstorm.bucket(), WeatherBucket::Thunderstorm);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Light < Severity::Moderate);
        assert!(Severity::Moderate < Severity::Severe);
        assert_eq!(WeatherCondition::HeavyRain.severity(), Severity::Severe);
        assert_eq!(WeatherCondition::Fog.severity(), Severity::Light);
    }

    #[test]
    fn test_time_of_day_boundaries() {
        let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        assert_eq!(TimeOfDay::from_time(at(4)), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_time(at(5)), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_time(at(12)), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_time(at(17)), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_time(at(21)), TimeOfDay::Night);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let json = serde_json::to_value(WeatherCondition::HeavyRain).unwrap();
        assert_eq!(json, serde_json::json!("heavy_rain"));

        let parsed: WeatherSnapshot = serde_json::from_value(serde_json::json!({
            "code": 95,
            "temperature": 22.5,
            "wind_speed": 30.0,
            "humidity": 80.0,
            "pressure": 1002.0
        }))
        .unwrap();
        assert_eq!(parsed.condition(), WeatherCondition::Thunderstorm);
    }

    #[test]
    fn test_validate_rejects_nan_and_bad_humidity() {
        let mut s = snapshot(0, f64::NAN);
        assert_eq!(s.validate(), Err(SnapshotError::NotFinite("temperature")));

        s.temperature = 10.0;
        s.humidity = 140.0;
        assert!(matches!(
            s.validate(),
            Err(SnapshotError::OutOfRange { field: "humidity", .. })
        ));

        s.humidity = 40.0;
        assert!(s.validate().is_ok());
    }
}
