//! Audio configuration types for WASM compatibility
//!
//! These pure data types carry no synthesis/playback logic, making them safe
//! for compilation to WebAssembly. They name the instruments and waveforms
//! and hold the timing of progression playback, shared by the native audio
//! engine and any web front end.

use std::fmt;

/// Available waveform types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Waveform {
    #[default]
    Sine,
    Saw,
    Square,
    Triangle,
}

impl Waveform {
    /// Parse waveform from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Waveform> {
        match s.to_lowercase().as_str() {
            "sine" | "sin" => Some(Waveform::Sine),
            "saw" | "sawtooth" => Some(Waveform::Saw),
            "square" | "sq" => Some(Waveform::Square),
            "triangle" | "tri" => Some(Waveform::Triangle),
            _ => None,
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Saw => "saw",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
        }
    }
}

/// Instrument used to voice a progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Instrument {
    /// Strummed, filtered saw/triangle pairs
    Guitar,
    /// Struck sine partials
    #[default]
    Piano,
}

impl Instrument {
    /// Parse instrument from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Instrument> {
        match s.trim().to_lowercase().as_str() {
            "guitar" | "gtr" => Some(Instrument::Guitar),
            "piano" | "pno" | "keys" => Some(Instrument::Piano),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Instrument::Guitar => "guitar",
            Instrument::Piano => "piano",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Timing and level settings for progression playback (seconds unless noted)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaybackConfig {
    /// Delay between "now" on the audio clock and the first chord
    pub lead_in: f64,
    /// Silence between consecutive chords
    pub gap: f64,
    /// Extra wait after the last chord before completion is reported
    pub completion_tail: f64,
    pub guitar_chord_duration: f64,
    pub piano_chord_duration: f64,
    /// Delay between successive strings of a strum
    pub strum_spread: f64,
    /// Summed level of one chord before per-note normalization
    pub master_level: f32,
}

impl PlaybackConfig {
    pub fn new() -> Self {
        Self {
            lead_in: 0.05,
            gap: 0.1,
            completion_tail: 0.15,
            guitar_chord_duration: 0.9,
            piano_chord_duration: 0.8,
            strum_spread: 0.03,
            master_level: 0.1,
        }
    }

    pub fn with_lead_in(mut self, lead_in: f64) -> Self {
        self.lead_in = lead_in.max(0.0);
        self
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap.max(0.0);
        self
    }

    pub fn with_completion_tail(mut self, tail: f64) -> Self {
        self.completion_tail = tail.max(0.0);
        self
    }

    pub fn with_chord_duration(mut self, instrument: Instrument, duration: f64) -> Self {
        let duration = duration.max(0.01);
        match instrument {
            Instrument::Guitar => self.guitar_chord_duration = duration,
            Instrument::Piano => self.piano_chord_duration = duration,
        }
        self
    }

    pub fn with_strum_spread(mut self, spread: f64) -> Self {
        self.strum_spread = spread.max(0.0);
        self
    }

    pub fn with_master_level(mut self, level: f32) -> Self {
        self.master_level = level.clamp(0.0, 1.0);
        self
    }

    /// How long each chord of `instrument` sounds
    pub fn chord_duration(&self, instrument: Instrument) -> f64 {
        match instrument {
            Instrument::Guitar => self.guitar_chord_duration,
            Instrument::Piano => self.piano_chord_duration,
        }
    }

    /// Distance between consecutive chord onsets
    pub fn step(&self, instrument: Instrument) -> f64 {
        self.chord_duration(instrument) + self.gap
    }

    /// Offset of chord `index` from the first chord's onset
    pub fn chord_offset(&self, instrument: Instrument, index: usize) -> f64 {
        index as f64 * self.step(instrument)
    }

    /// Length of the whole schedule for `chord_count` chords, lead-in excluded
    pub fn schedule_length(&self, instrument: Instrument, chord_count: usize) -> f64 {
        chord_count as f64 * self.step(instrument)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_waveform_parsing() {
        assert_eq!(Waveform::from_str("sine"), Some(Waveform::Sine));
        assert_eq!(Waveform::from_str("SAW"), Some(Waveform::Saw));
        assert_eq!(Waveform::from_str("Square"), Some(Waveform::Square));
        assert_eq!(Waveform::from_str("tri"), Some(Waveform::Triangle));
        assert_eq!(Waveform::from_str("invalid"), None);
    }

    #[test]
    fn test_default_waveform_is_sine() {
        assert_eq!(Waveform::default(), Waveform::Sine);
    }

    #[test]
    fn test_instrument_parsing() {
        assert_eq!(Instrument::from_str("guitar"), Some(Instrument::Guitar));
        assert_eq!(Instrument::from_str(" Piano "), Some(Instrument::Piano));
        assert_eq!(Instrument::from_str("drums"), None);
        assert_eq!(Instrument::default(), Instrument::Piano);
        assert_eq!(Instrument::Guitar.to_string(), "guitar");
    }

    #[test]
    fn test_default_timing() {
        let config = PlaybackConfig::default();
        assert_relative_eq!(config.step(Instrument::Guitar), 1.0);
        assert_relative_eq!(config.step(Instrument::Piano), 0.9);
        assert_relative_eq!(config.chord_offset(Instrument::Piano, 3), 2.7);
        assert_relative_eq!(config.schedule_length(Instrument::Guitar, 4), 4.0);
        assert_relative_eq!(config.lead_in, 0.05);
    }

    #[test]
    fn test_builder_clamps() {
        let config = PlaybackConfig::new()
            .with_gap(-1.0)
            .with_master_level(3.0)
            .with_chord_duration(Instrument::Piano, 0.0);
        assert_eq!(config.gap, 0.0);
        assert_eq!(config.master_level, 1.0);
        assert!(config.piano_chord_duration > 0.0);
    }
}
