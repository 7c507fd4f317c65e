//! Oscillators
//!
//! `Oscillator` is a phase accumulator in `[0, 1)` producing one of the
//! four `Waveform`s at a fixed frequency. Amplitude shaping happens in the
//! owning `Voice`.

use chordmood_core::Waveform;
use std::f32::consts::TAU;

#[derive(Debug, Clone)]
pub struct Oscillator {
    frequency: f32,
    phase: f32,
    waveform: Waveform,
}

impl Oscillator {
    /// Create an oscillator at `frequency` Hz, phase zero
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        Self {
            frequency,
            phase: 0.0,
            waveform,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let value = shape(self.waveform, self.phase);
        self.phase = (self.phase + self.frequency / sample_rate).fract();
        value
    }
}

/// One cycle of `waveform`, `phase` in `[0, 1)`
fn shape(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sine => (TAU * phase).sin(),
        Waveform::Saw => 2.0 * phase - 1.0,
        Waveform::Square => 1.0f32.copysign(0.5 - phase),
        Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;

    fn assert_in_range(waveform: Waveform) {
        let mut osc = Oscillator::new(waveform, 440.0);
        for _ in 0..1000 {
            let sample = osc.next_sample(SAMPLE_RATE);
            assert!(
                (-1.0..=1.0).contains(&sample),
                "{} out of range: {}",
                waveform.name(),
                sample
            );
        }
    }

    #[test]
    fn test_waveform_ranges() {
        assert_in_range(Waveform::Sine);
        assert_in_range(Waveform::Saw);
        assert_in_range(Waveform::Square);
        assert_in_range(Waveform::Triangle);
    }

    #[test]
    fn test_sine_starts_at_zero() {
        let mut osc = Oscillator::new(Waveform::Sine, 440.0);
        assert_eq!(osc.next_sample(SAMPLE_RATE), 0.0);
    }

    #[test]
    fn test_period_matches_frequency() {
        // 125 Hz at 8000 Hz: one period every 64 samples, exact in binary
        let mut osc = Oscillator::new(Waveform::Saw, 125.0);
        let first: Vec<f32> = (0..64).map(|_| osc.next_sample(8000.0)).collect();
        let second: Vec<f32> = (0..64).map(|_| osc.next_sample(8000.0)).collect();
        for (a, b) in first.iter().zip(second.iter()) {
            assert!((a - b).abs() < 1e-3, "period mismatch: {} vs {}", a, b);
        }
    }

    #[test]
    fn test_cycle_shapes() {
        assert_eq!(shape(Waveform::Triangle, 0.0), -1.0);
        assert_eq!(shape(Waveform::Triangle, 0.5), 1.0);
        assert_eq!(shape(Waveform::Square, 0.25), 1.0);
        assert_eq!(shape(Waveform::Square, 0.75), -1.0);
        assert_eq!(shape(Waveform::Saw, 0.0), -1.0);
        assert_eq!(shape(Waveform::Saw, 0.75), 0.5);
    }

    #[test]
    fn test_accessors() {
        let osc = Oscillator::new(Waveform::Triangle, 220.0);
        assert_eq!(osc.frequency(), 220.0);
        assert_eq!(osc.waveform(), Waveform::Triangle);
    }
}
