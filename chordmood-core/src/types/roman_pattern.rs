//! Roman numeral patterns
//!
//! A `RomanPattern` is the key-independent shape of a progression, e.g.
//! `I-V-vi-IV`. Patterns are derived from chords on demand and compared by
//! their `-`-joined text, which is also how the song catalog is keyed.

use crate::types::chord_symbol::{chord_quality, is_minor_key, parse_root};
use crate::types::roman_numeral::{RomanNumeral, interval_to_roman};
use anyhow::Result;
use std::fmt;
use std::str::FromStr;

/// Ordered sequence of roman numerals
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RomanPattern {
    numerals: Vec<RomanNumeral>,
}

impl RomanPattern {
    pub fn new(numerals: Vec<RomanNumeral>) -> Self {
        Self { numerals }
    }

    /// Analyze chords relative to a key
    pub fn analyze<S: AsRef<str>>(chords: &[S], key: &str) -> Self {
        let (_, key_semitone) = parse_root(key);
        let key_is_minor = is_minor_key(key);

        let numerals = chords
            .iter()
            .map(|chord| {
                let chord = chord.as_ref();
                let (_, semitone) = parse_root(chord);
                let distance = (semitone + 12 - key_semitone) % 12;
                interval_to_roman(distance, chord_quality(chord), key_is_minor)
            })
            .collect();

        Self { numerals }
    }

    pub fn numerals(&self) -> &[RomanNumeral] {
        &self.numerals
    }

    pub fn len(&self) -> usize {
        self.numerals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numerals.is_empty()
    }

    /// Contiguous sub-patterns of `len` numerals, left to right
    ///
    /// Yields nothing when the pattern is shorter than `len` or `len` is 0.
    pub fn windows(&self, len: usize) -> impl Iterator<Item = (usize, RomanPattern)> + '_ {
        let count = if len == 0 || len > self.numerals.len() {
            0
        } else {
            self.numerals.len() - len + 1
        };
        (0..count).map(move |start| {
            (
                start,
                RomanPattern::new(self.numerals[start..start + len].to_vec()),
            )
        })
    }
}

/// Roman numeral pattern of a progression in a key, e.g. `vi-IV-I-V`
///
/// Pure and deterministic; malformed chords analyze as if rooted on C.
pub fn to_pattern<S: AsRef<str>>(chords: &[S], key: &str) -> String {
    RomanPattern::analyze(chords, key).to_string()
}

impl fmt::Display for RomanPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, numeral) in self.numerals.iter().enumerate() {
            if i > 0 {
                write!(f, "-")?;
            }
            write!(f, "{}", numeral)?;
        }
        Ok(())
    }
}

impl FromStr for RomanPattern {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(RomanPattern::default());
        }
        let numerals = s
            .split('-')
            .map(str::parse)
            .collect::<Result<Vec<RomanNumeral>>>()?;
        Ok(RomanPattern { numerals })
    }
}
