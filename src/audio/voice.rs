//! A scheduled sound source
//!
//! A `Voice` is one unit of scheduled audio: a set of oscillators sharing a
//! gain automation and an optional swept low-pass filter, audible between its
//! start and stop times on the audio clock.

use crate::audio::envelope::Automation;
use crate::audio::filter::LowpassFilter;
use crate::audio::oscillator::Oscillator;
use chordmood_core::Waveform;

/// Filter coefficients are recomputed every this many samples
const FILTER_UPDATE_INTERVAL: u32 = 16;

#[derive(Debug, Clone)]
struct FilterStage {
    filter: Option<LowpassFilter>,
    cutoff: Automation,
    q: f32,
    countdown: u32,
}

#[derive(Debug, Clone)]
pub struct Voice {
    oscillators: Vec<Oscillator>,
    gain: Automation,
    filter: Option<FilterStage>,
    start: f64,
    stop: f64,
}

impl Voice {
    /// Create a silent voice audible over `[start, stop)` seconds
    pub fn new(start: f64, stop: f64, gain: Automation) -> Self {
        Self {
            oscillators: Vec::new(),
            gain,
            filter: None,
            start,
            stop: stop.max(start),
        }
    }

    pub fn with_oscillator(mut self, waveform: Waveform, frequency: f32) -> Self {
        self.oscillators.push(Oscillator::new(waveform, frequency));
        self
    }

    /// Run the summed oscillators through a low-pass with automated cutoff
    pub fn with_lowpass(mut self, cutoff: Automation, q: f32) -> Self {
        self.filter = Some(FilterStage {
            filter: None,
            cutoff,
            q,
            countdown: 0,
        });
        self
    }

    pub fn start_time(&self) -> f64 {
        self.start
    }

    pub fn stop_time(&self) -> f64 {
        self.stop
    }

    pub fn gain(&self) -> &Automation {
        &self.gain
    }

    pub fn cutoff(&self) -> Option<&Automation> {
        self.filter.as_ref().map(|stage| &stage.cutoff)
    }

    pub fn frequencies(&self) -> Vec<f32> {
        self.oscillators.iter().map(Oscillator::frequency).collect()
    }

    pub fn waveforms(&self) -> Vec<Waveform> {
        self.oscillators.iter().map(Oscillator::waveform).collect()
    }

    pub fn is_active(&self, time: f64) -> bool {
        time >= self.start && time < self.stop
    }

    pub fn is_finished(&self, time: f64) -> bool {
        time >= self.stop
    }

    /// Render one sample at `time`; silent outside the voice's lifetime
    pub fn render(&mut self, time: f64, sample_rate: f32) -> f32 {
        if !self.is_active(time) {
            return 0.0;
        }

        let mut sample: f32 = self
            .oscillators
            .iter_mut()
            .map(|osc| osc.next_sample(sample_rate))
            .sum();

        if let Some(stage) = &mut self.filter {
            if stage.countdown == 0 {
                let cutoff = stage.cutoff.value_at(time);
                match &mut stage.filter {
                    Some(filter) => filter.set_lowpass(cutoff, stage.q, sample_rate),
                    None => stage.filter = Some(LowpassFilter::new(cutoff, stage.q, sample_rate)),
                }
                stage.countdown = FILTER_UPDATE_INTERVAL;
            }
            stage.countdown -= 1;
            if let Some(filter) = &mut stage.filter {
                sample = filter.process(sample);
            }
        }

        sample * self.gain.value_at(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 8000.0;

    fn flat_gain(level: f32) -> Automation {
        let mut gain = Automation::new(0.0);
        gain.set_value_at_time(level, 0.0);
        gain
    }

    #[test]
    fn test_silent_outside_lifetime() {
        let mut voice = Voice::new(1.0, 2.0, flat_gain(1.0)).with_oscillator(Waveform::Square, 100.0);
        assert_eq!(voice.render(0.5, SAMPLE_RATE), 0.0);
        assert_ne!(voice.render(1.0, SAMPLE_RATE), 0.0);
        assert_eq!(voice.render(2.0, SAMPLE_RATE), 0.0);
        assert!(voice.is_finished(2.0));
        assert!(!voice.is_finished(1.999));
    }

    #[test]
    fn test_gain_scales_output() {
        let mut voice = Voice::new(0.0, 1.0, flat_gain(0.25)).with_oscillator(Waveform::Square, 100.0);
        assert_eq!(voice.render(0.0, SAMPLE_RATE), 0.25);
    }

    #[test]
    fn test_oscillators_are_summed() {
        let voice = Voice::new(0.0, 1.0, flat_gain(1.0))
            .with_oscillator(Waveform::Saw, 220.0)
            .with_oscillator(Waveform::Triangle, 220.0);
        assert_eq!(voice.frequencies(), vec![220.0, 220.0]);
        assert_eq!(voice.waveforms(), vec![Waveform::Saw, Waveform::Triangle]);
    }

    #[test]
    fn test_lowpass_stage_renders_finite() {
        let mut cutoff = Automation::new(1000.0);
        cutoff
            .set_value_at_time(2000.0, 0.0)
            .exponential_ramp_to_value_at_time(300.0, 0.5);
        let mut voice = Voice::new(0.0, 1.0, flat_gain(0.5))
            .with_oscillator(Waveform::Saw, 110.0)
            .with_lowpass(cutoff, 1.0);
        assert!(voice.cutoff().is_some());
        for n in 0..8000 {
            let sample = voice.render(n as f64 / SAMPLE_RATE as f64, SAMPLE_RATE);
            assert!(sample.is_finite());
            assert!(sample.abs() <= 1.0);
        }
    }

    #[test]
    fn test_stop_never_precedes_start() {
        let voice = Voice::new(2.0, 1.0, Automation::default());
        assert_eq!(voice.stop_time(), 2.0);
    }
}
