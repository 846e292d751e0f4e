//! Vibration timelines.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One step of a timeline. Zero intensity is a silent gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub duration_ms: u32,
    pub intensity: f32,
}

impl Pulse {
    pub fn new(duration_ms: u32, intensity: f32) -> Self {
        Self {
            duration_ms,
            intensity: clamp_unit(intensity),
        }
    }

    pub fn gap(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            intensity: 0.,
        }
    }

    pub fn is_silent(&self) -> bool {
        self.intensity <= 0.
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.
    } else {
        value.clamp(0., 1.)
    }
}

/// Ordered pulse sequence. Never mutated once built; combinators return new
/// patterns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HapticPattern {
    pulses: Vec<Pulse>,
}

impl HapticPattern {
    pub fn new(pulses: Vec<Pulse>) -> Self {
        Self { pulses }
    }

    pub fn single(duration_ms: u32, intensity: f32) -> Self {
        Self::new(vec![Pulse::new(duration_ms, intensity)])
    }

    /// `count` equal pulses separated by `off_ms` of silence.
    pub fn train(count: usize, on_ms: u32, off_ms: u32, intensity: f32) -> Self {
        Self::ramp(count, on_ms, off_ms, intensity, intensity)
    }

    /// `count` pulses whose intensity moves linearly from `from` to `to`.
    pub fn ramp(count: usize, on_ms: u32, off_ms: u32, from: f32, to: f32) -> Self {
        let mut pulses = Vec::with_capacity(count * 2);
        for i in 0..count {
            if i > 0 {
                pulses.push(Pulse::gap(off_ms));
            }
            let t = if count > 1 {
                i as f32 / (count - 1) as f32
            } else {
                0.
            };
            pulses.push(Pulse::new(on_ms, from + (to - from) * t));
        }
        Self::new(pulses)
    }

    /// Joins patterns end to end with `gap_ms` of silence between them.
    pub fn sequence(patterns: impl IntoIterator<Item = HapticPattern>, gap_ms: u32) -> Self {
        patterns
            .into_iter()
            .filter(|p| !p.is_empty())
            .fold(Self::default(), |acc, p| acc.then(&p, gap_ms))
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    /// True when nothing would be felt.
    pub fn is_empty(&self) -> bool {
        self.pulses.iter().all(Pulse::is_silent)
    }

    /// Number of audible pulses.
    pub fn pulse_count(&self) -> usize {
        self.pulses.iter().filter(|p| !p.is_silent()).count()
    }

    pub fn peak_intensity(&self) -> f32 {
        self.pulses.iter().map(|p| p.intensity).fold(0., f32::max)
    }

    pub fn total_duration(&self) -> Duration {
        Duration::from_millis(self.pulses.iter().map(|p| u64::from(p.duration_ms)).sum())
    }

    #[must_use]
    pub fn scaled(&self, multiplier: f32) -> Self {
        let multiplier = clamp_unit(multiplier);
        Self::new(
            self.pulses
                .iter()
                .map(|p| Pulse::new(p.duration_ms, p.intensity * multiplier))
                .collect(),
        )
    }

    #[must_use]
    pub fn then(mut self, next: &HapticPattern, gap_ms: u32) -> Self {
        if next.pulses.is_empty() {
            return self;
        }
        if !self.pulses.is_empty() && gap_ms > 0 {
            self.pulses.push(Pulse::gap(gap_ms));
        }
        self.pulses.extend_from_slice(&next.pulses);
        self
    }

    /// On/off millisecond list, starting with "on", as accepted by platform
    /// vibrate calls that have no notion of intensity.
    pub fn to_vibration_sequence(&self) -> Vec<u32> {
        let mut out: Vec<u32> = Vec::new();
        let mut on = true;

        for pulse in &self.pulses {
            if pulse.duration_ms == 0 {
                continue;
            }
            let audible = !pulse.is_silent();
            if out.is_empty() && !audible {
                // Leading silence has no representation.
                continue;
            }
            if audible == on {
                if let Some(last) = out.last_mut() {
                    *last += pulse.duration_ms;
                    continue;
                }
            }
            on = audible;
            out.push(pulse.duration_ms);
        }

        if !on {
            out.pop();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_intensity_is_clamped() {
        assert_eq!(Pulse::new(10, 1.5).intensity, 1.);
        assert_eq!(Pulse::new(10, -0.5).intensity, 0.);
        assert_eq!(Pulse::new(10, f32::NAN).intensity, 0.);
    }

    #[test]
    fn test_train_interleaves_gaps() {
        let p = HapticPattern::train(3, 30, 20, 0.5);
        assert_eq!(p.pulses().len(), 5);
        assert_eq!(p.pulse_count(), 3);
        assert_eq!(p.total_duration(), Duration::from_millis(130));
    }

    #[test]
    fn test_ramp_endpoints() {
        let p = HapticPattern::ramp(3, 40, 40, 0.2, 0.8);
        let audible: Vec<f32> = p
            .pulses()
            .iter()
            .filter(|p| !p.is_silent())
            .map(|p| p.intensity)
            .collect();
        assert_eq!(audible.len(), 3);
        assert!((audible[0] - 0.2).abs() < 1e-6);
        assert!((audible[1] - 0.5).abs() < 1e-6);
        assert!((audible[2] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_scaled_multiplies_and_clamps() {
        let p = HapticPattern::single(50, 0.8).scaled(0.5);
        assert!((p.peak_intensity() - 0.4).abs() < 1e-6);

        let zero = HapticPattern::single(50, 0.8).scaled(0.);
        assert!(zero.is_empty());
    }

    #[test]
    fn test_then_inserts_single_gap() {
        let p = HapticPattern::single(10, 1.).then(&HapticPattern::single(20, 1.), 100);
        assert_eq!(
            p.pulses(),
            &[Pulse::new(10, 1.), Pulse::gap(100), Pulse::new(20, 1.)]
        );
    }

    #[test]
    fn test_sequence_skips_empty_patterns() {
        let p = HapticPattern::sequence(
            [
                HapticPattern::single(10, 1.),
                HapticPattern::default(),
                HapticPattern::single(20, 1.),
            ],
            50,
        );
        assert_eq!(p.pulse_count(), 2);
        assert_eq!(p.total_duration(), Duration::from_millis(80));
    }

    #[test]
    fn test_vibration_sequence_merges_runs() {
        let p = HapticPattern::new(vec![
            Pulse::gap(30),
            Pulse::new(20, 0.5),
            Pulse::new(20, 1.),
            Pulse::gap(10),
            Pulse::gap(15),
            Pulse::new(40, 0.2),
            Pulse::gap(60),
        ]);
        assert_eq!(p.to_vibration_sequence(), vec![40, 25, 40]);
    }

    #[test]
    fn test_vibration_sequence_of_silence_is_empty() {
        let p = HapticPattern::new(vec![Pulse::gap(30)]);
        assert!(p.to_vibration_sequence().is_empty());
    }
}
