//! Damping applied to raw finger travel.

use serde::{Deserialize, Serialize};

/// Damps `raw` by `factor` and caps the result at `cap`.
///
/// Negative travel counts as zero travel, so the result is always in `[0, cap]`.
pub fn resist(raw: f64, factor: f64, cap: f64) -> f64 {
    (raw.max(0.) * factor).min(cap)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResistanceModel {
    pub factor: f64,
    pub cap: f64,
}

impl ResistanceModel {
    pub fn new(factor: f64, cap: f64) -> Self {
        Self { factor, cap }
    }

    pub fn apply(&self, raw: f64) -> f64 {
        resist(raw, self.factor, self.cap)
    }

    /// Damps the magnitude and keeps the sign, for offsets that can go either way.
    pub fn apply_signed(&self, raw: f64) -> f64 {
        let damped = self.apply(raw.abs());
        if raw < 0. {
            -damped
        } else {
            damped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resist_damps_and_caps() {
        assert_eq!(resist(100., 0.5, 120.), 50.);
        assert_eq!(resist(1000., 0.5, 120.), 120.);
        assert_eq!(resist(0., 0.5, 120.), 0.);
    }

    #[test]
    fn test_resist_negative_is_zero() {
        assert_eq!(resist(-40., 0.5, 120.), 0.);
    }

    #[test]
    fn test_resist_monotonic_and_bounded() {
        let model = ResistanceModel::new(0.55, 120.);
        let mut prev = model.apply(0.);
        for step in 1..2000 {
            let x = step as f64 * 0.5;
            let y = model.apply(x);
            assert!(y >= prev, "not monotonic at {x}");
            assert!(y <= model.cap);
            prev = y;
        }
    }

    #[test]
    fn test_resist_is_not_cumulative() {
        let model = ResistanceModel::new(0.5, 120.);
        let first = model.apply(60.);
        let again = model.apply(60.);
        assert_eq!(first, again);
    }

    #[test]
    fn test_apply_signed_mirrors() {
        let model = ResistanceModel::new(0.3, 120.);
        assert_eq!(model.apply_signed(100.), 30.);
        assert_eq!(model.apply_signed(-100.), -30.);
        assert_eq!(model.apply_signed(-1000.), -120.);
    }
}
