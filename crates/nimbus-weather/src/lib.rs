//! Weather state for Nimbus
//!
//! The forecast screens push [`WeatherSnapshot`]s; the haptics layer turns
//! them into [`WeatherHapticContext`]s and diffs consecutive readings.

pub mod context;
pub mod types;

pub use context::WeatherHapticContext;
pub use types::*;
