//! # Chordmood
//!
//! Chordmood is a chord progression browser. Type a progression and it
//! names its roman numeral pattern, lists well-known songs built on the
//! same pattern and plays the chords back on a synthesized guitar or piano.
//!
//! ## Modules
//!
//! - `audio`: The audio clock, voice synthesis, timers and the
//!   `ProgressionPlayer` that schedules one playback at a time.
//! - `commands`: REPL command handlers and their registry.
//! - `logging`: Stderr backend for the `log` facade.
//! - `repl`: The interactive Read-Eval-Print Loop.
//!
//! Harmonic analysis lives in the `chordmood-core` crate and is re-exported
//! here.

pub mod audio;
pub mod commands;
pub mod logging;
pub mod repl;

// Re-export commonly used types and functions for convenience
pub use crate::audio::{PlaybackHandle, PlaybackState, ProgressionPlayer};
pub use chordmood_core::{
    ChordQuality, ChordSymbol, Instrument, PlaybackConfig, RomanPattern, SongCatalog, SongEntry,
    VoicingLibrary, find_similar_songs, to_pattern,
};
pub use chordmood_core::types::{chord_quality, interval_to_roman, is_minor_key, parse_root};
