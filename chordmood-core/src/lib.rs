//! # Chordmood Core
//!
//! WASM-compatible harmonic analysis for the chordmood progression browser.
//! Provides chord symbol parsing, roman numeral patterns, the song catalog
//! and the chord voicing tables, without audio dependencies.
//!
//! ## Features
//!
//! - **serde**: Enable serialization of the public data types
//! - **wasm**: Enable WASM bindings via wasm-bindgen
//!
//! ## Example
//!
//! ```
//! use chordmood_core::{find_similar_songs, to_pattern};
//!
//! assert_eq!(to_pattern(&["Am", "F", "C", "G"], "Am"), "i-VI-III-VII");
//! let songs = find_similar_songs(&["C", "G", "Am", "F"], "C");
//! assert_eq!(songs[0].title, "Let It Be");
//! ```

pub mod analysis;
pub mod catalog;
pub mod types;
pub mod voicings;
pub mod wasm;

// Re-export commonly used types
pub use analysis::{MatchKind, PatternMatch, find_similar_songs};
pub use catalog::SongCatalog;
pub use types::{
    ChordQuality, ChordSymbol, Instrument, PlaybackConfig, Progression, RomanNumeral,
    RomanPattern, SongEntry, Waveform, to_pattern,
};
pub use voicings::VoicingLibrary;
