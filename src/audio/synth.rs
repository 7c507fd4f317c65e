//! Instrument synthesis strategies
//!
//! Each instrument turns the note names of one chord into a set of `Voice`s
//! scheduled on the audio clock:
//!
//! - **Piano**: every note is a stack of four sine partials with a fast
//!   linear attack and an exponential decay to near silence.
//! - **Guitar**: notes are strummed low to high; each is a sawtooth and a
//!   triangle through a shared low-pass whose cutoff closes over the note.
//!
//! Note names the tuning table does not know are skipped.

use crate::audio::envelope::{Automation, MIN_EXPONENTIAL_VALUE};
use crate::audio::voice::Voice;
use chordmood_core::types::note::reference_frequency;
use chordmood_core::{Instrument, PlaybackConfig, Waveform};

/// Piano partials as (frequency multiple, relative level)
pub const PIANO_PARTIALS: [(f32, f32); 4] = [(1.0, 1.0), (2.0, 0.4), (3.0, 0.15), (4.0, 0.06)];

const PIANO_ATTACK: f64 = 0.008;
const PIANO_FLOOR_RATIO: f32 = 0.01;

const GUITAR_ATTACK: f64 = 0.005;
const GUITAR_FLOOR_RATIO: f32 = 0.02;
const GUITAR_FILTER_Q: f32 = 1.0;
const GUITAR_CUTOFF_START_RATIO: f32 = 6.0;
const GUITAR_CUTOFF_END_RATIO: f32 = 1.5;
const GUITAR_MIN_CUTOFF: f32 = 200.0;
/// Portion of the remaining note over which the cutoff closes
const GUITAR_CUTOFF_SWEEP: f64 = 0.7;

/// Oscillators outlive their envelope by this much
pub const RELEASE_PADDING: f64 = 0.02;

/// Level of each note in a chord of `note_count` notes
pub fn note_level(config: &PlaybackConfig, note_count: usize) -> f32 {
    config.master_level / note_count.max(1) as f32
}

/// Voices for one chord starting at `start` and lasting `duration` seconds
pub fn voice_chord<S: AsRef<str>>(
    instrument: Instrument,
    notes: &[S],
    start: f64,
    duration: f64,
    config: &PlaybackConfig,
) -> Vec<Voice> {
    match instrument {
        Instrument::Piano => piano_chord(notes, start, duration, config),
        Instrument::Guitar => guitar_chord(notes, start, duration, config),
    }
}

/// Additive piano: one voice per partial per note
pub fn piano_chord<S: AsRef<str>>(
    notes: &[S],
    start: f64,
    duration: f64,
    config: &PlaybackConfig,
) -> Vec<Voice> {
    let level = note_level(config, notes.len());
    let end = start + duration;
    let mut voices = Vec::with_capacity(notes.len() * PIANO_PARTIALS.len());

    for note in notes {
        let Some(frequency) = reference_frequency(note.as_ref()) else {
            continue;
        };

        for (multiple, weight) in PIANO_PARTIALS {
            let peak = level * weight;
            let floor = (peak * PIANO_FLOOR_RATIO).max(MIN_EXPONENTIAL_VALUE);

            let mut gain = Automation::new(0.0);
            gain.set_value_at_time(0.0, start)
                .linear_ramp_to_value_at_time(peak, start + PIANO_ATTACK)
                .exponential_ramp_to_value_at_time(floor, end);

            voices.push(
                Voice::new(start, end + RELEASE_PADDING, gain)
                    .with_oscillator(Waveform::Sine, frequency * multiple),
            );
        }
    }

    voices
}

/// Subtractive strummed guitar: one filtered saw+triangle voice per note
pub fn guitar_chord<S: AsRef<str>>(
    notes: &[S],
    start: f64,
    duration: f64,
    config: &PlaybackConfig,
) -> Vec<Voice> {
    let level = note_level(config, notes.len());
    let mut voices = Vec::with_capacity(notes.len());

    // Strum position counts every string, including ones we cannot tune
    for (string, note) in notes.iter().enumerate() {
        let Some(frequency) = reference_frequency(note.as_ref()) else {
            continue;
        };

        let offset = string as f64 * config.strum_spread;
        let remaining = duration - offset;
        // Strummed past the chord's end: the string would start and stop
        // at or after its own release, so it never sounds
        if remaining <= 0.0 {
            continue;
        }
        let onset = start + offset;
        let end = onset + remaining;

        let mut cutoff = Automation::new(frequency * GUITAR_CUTOFF_START_RATIO);
        cutoff
            .set_value_at_time(frequency * GUITAR_CUTOFF_START_RATIO, onset)
            .exponential_ramp_to_value_at_time(
                (frequency * GUITAR_CUTOFF_END_RATIO).max(GUITAR_MIN_CUTOFF),
                onset + GUITAR_CUTOFF_SWEEP * remaining,
            );

        let floor = (level * GUITAR_FLOOR_RATIO).max(MIN_EXPONENTIAL_VALUE);
        let mut gain = Automation::new(0.0);
        gain.set_value_at_time(0.0, onset)
            .linear_ramp_to_value_at_time(level, onset + GUITAR_ATTACK)
            .exponential_ramp_to_value_at_time(floor, end);

        voices.push(
            Voice::new(onset, end + RELEASE_PADDING, gain)
                .with_oscillator(Waveform::Saw, frequency)
                .with_oscillator(Waveform::Triangle, frequency)
                .with_lowpass(cutoff, GUITAR_FILTER_Q),
        );
    }

    voices
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> PlaybackConfig {
        PlaybackConfig::default()
    }

    #[test]
    fn test_note_level_normalizes_by_count() {
        assert_relative_eq!(note_level(&config(), 4), 0.025);
        assert_relative_eq!(note_level(&config(), 0), 0.1);
    }

    #[test]
    fn test_piano_partials() {
        let voices = piano_chord(&["C", "E", "G"], 1.0, 0.8, &config());
        assert_eq!(voices.len(), 12);

        let c = &voices[..4];
        let expected = [261.63, 523.26, 784.89, 1046.52];
        for (voice, freq) in c.iter().zip(expected) {
            assert_relative_eq!(voice.frequencies()[0], freq, epsilon = 0.01);
            assert_eq!(voice.waveforms(), vec![Waveform::Sine]);
            assert_relative_eq!(voice.start_time(), 1.0);
            assert_relative_eq!(voice.stop_time(), 1.82, epsilon = 1e-9);
        }

        // Fundamental peaks at the per-note level after the attack
        let level = 0.1 / 3.0;
        assert_relative_eq!(c[0].gain().value_at(1.008), level, epsilon = 1e-6);
        assert_relative_eq!(c[1].gain().value_at(1.008), level * 0.4, epsilon = 1e-6);
        assert_relative_eq!(c[0].gain().final_value(), level * 0.01, epsilon = 1e-7);
        assert_eq!(c[0].gain().value_at(0.9), 0.0);
    }

    #[test]
    fn test_unknown_notes_are_skipped() {
        let voices = piano_chord(&["C", "X", "G"], 0.0, 0.8, &config());
        assert_eq!(voices.len(), 8);
        // Level still divides by the full note count
        assert_relative_eq!(voices[0].gain().value_at(0.008), 0.1 / 3.0, epsilon = 1e-6);

        assert!(guitar_chord(&["?", "??"], 0.0, 0.9, &config()).is_empty());
    }

    #[test]
    fn test_guitar_strum_offsets() {
        let notes = ["E", "B", "E", "G#", "B", "E"];
        let voices = guitar_chord(&notes, 2.0, 0.9, &config());
        assert_eq!(voices.len(), 6);
        for (i, voice) in voices.iter().enumerate() {
            let onset = 2.0 + i as f64 * 0.03;
            assert_relative_eq!(voice.start_time(), onset, epsilon = 1e-9);
            assert_relative_eq!(voice.stop_time(), 2.9 + RELEASE_PADDING, epsilon = 1e-9);
            assert_eq!(voice.waveforms(), vec![Waveform::Saw, Waveform::Triangle]);
        }
    }

    #[test]
    fn test_guitar_strum_longer_than_chord() {
        // 0.1s chord, 0.03s per string: strings 0 to 3 sound, 4 and 5 start too late
        let notes = ["E", "A", "D", "G", "B", "E"];
        let voices = guitar_chord(&notes, 0.0, 0.1, &config());
        assert_eq!(voices.len(), 4);
        let last = voices.last().unwrap();
        assert_relative_eq!(last.start_time(), 0.09, epsilon = 1e-9);
        assert_relative_eq!(last.stop_time(), 0.1 + RELEASE_PADDING, epsilon = 1e-9);
    }

    #[test]
    fn test_guitar_cutoff_sweep() {
        let voices = guitar_chord(&["A"], 0.0, 0.9, &config());
        let cutoff = voices[0].cutoff().unwrap();
        let a = 261.63 * 2f32.powf(9.0 / 12.0);
        assert_relative_eq!(cutoff.value_at(0.0), a * 6.0, epsilon = 0.05);
        assert_relative_eq!(cutoff.final_value(), a * 1.5, epsilon = 0.05);
        assert_relative_eq!(cutoff.end_time(), 0.63, epsilon = 1e-9);

        // C4 closes to one and a half times its fundamental
        let low = guitar_chord(&["C"], 0.0, 0.9, &config());
        assert_relative_eq!(low[0].cutoff().unwrap().final_value(), 392.445, epsilon = 0.01);
    }

    #[test]
    fn test_guitar_gain_envelope() {
        let voices = guitar_chord(&["C", "E"], 0.0, 0.9, &config());
        let gain = voices[1].gain();
        assert_eq!(gain.value_at(0.03), 0.0);
        assert_relative_eq!(gain.value_at(0.035), 0.05, epsilon = 1e-6);
        assert_relative_eq!(gain.final_value(), 0.001, epsilon = 1e-7);
        assert_relative_eq!(gain.end_time(), 0.9, epsilon = 1e-9);
    }

    #[test]
    fn test_instrument_dispatch() {
        assert_eq!(voice_chord(Instrument::Piano, &["C"], 0.0, 0.8, &config()).len(), 4);
        assert_eq!(voice_chord(Instrument::Guitar, &["C"], 0.0, 0.9, &config()).len(), 1);
    }
}
