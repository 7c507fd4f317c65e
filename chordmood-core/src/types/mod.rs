// chordmood-core/src/types/mod.rs

pub mod audio_config;
pub mod chord_symbol;
pub mod note;
pub mod roman_numeral;
pub mod roman_pattern;
pub mod song;
pub mod voicing;

pub use audio_config::{Instrument, PlaybackConfig, Waveform};
pub use chord_symbol::{ChordQuality, ChordSymbol, chord_quality, is_minor_key, parse_root};
pub use roman_numeral::{RomanNumeral, ScaleDegree, interval_to_roman};
pub use roman_pattern::{RomanPattern, to_pattern};
pub use song::{Complexity, Progression, SongEntry};
pub use voicing::{GuitarVoicing, PianoVoicing};
