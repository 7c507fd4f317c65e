//! Chord symbol parsing
//!
//! A chord symbol is free text such as `Am7`, `D/F#` or `Bbmaj7`. Only two
//! facts matter for harmonic analysis: the root (letter plus optional `#`/`b`)
//! and whether the chord is minor. Extensions (`7`, `maj7`, `m7b5`, `9`...)
//! and slash basses are carried along but never change the analysis.
//!
//! Parsing never fails. A root outside the note alias table resolves to C.

use crate::types::note::pitch_class;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Major/minor quality of a chord, as used for roman numeral casing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChordQuality {
    Major,
    Minor,
}

impl ChordQuality {
    pub fn name(&self) -> &'static str {
        match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
        }
    }
}

/// Harmonic part of a symbol: everything before a slash, unless the slash
/// is the very first character.
fn harmonic_part(symbol: &str) -> &str {
    match symbol.find('/') {
        Some(i) if i > 0 => &symbol[..i],
        _ => symbol,
    }
}

/// Root text of a chord symbol: one character, or two when the second is
/// `#` or `b`. An empty symbol yields `"C"`.
pub fn root_text(symbol: &str) -> &str {
    let base = harmonic_part(symbol);
    let Some(first) = base.chars().next() else {
        return "C";
    };
    let first_end = first.len_utf8();
    match base[first_end..].chars().next() {
        Some('#') | Some('b') => &base[..first_end + 1],
        _ => &base[..first_end],
    }
}

/// Root of a chord symbol and its semitone value (C = 0 ... B = 11)
///
/// The slash bass is ignored. Unknown roots degrade to semitone 0.
pub fn parse_root(symbol: &str) -> (&str, u8) {
    let root = root_text(symbol);
    (root, pitch_class(root).unwrap_or(0))
}

/// Text following the root, up to (not including) any slash
fn suffix_after_root(symbol: &str) -> &str {
    let root = root_text(symbol);
    let rest = symbol.get(root.len()..).unwrap_or("");
    rest.split('/').next().unwrap_or("")
}

fn is_minor_suffix(suffix: &str) -> bool {
    suffix.starts_with('m') && !suffix.starts_with("maj")
}

/// Major/minor quality of a chord symbol
///
/// Minor when the suffix begins with `m` but not `maj`.
pub fn chord_quality(symbol: &str) -> ChordQuality {
    if is_minor_suffix(suffix_after_root(symbol)) {
        ChordQuality::Minor
    } else {
        ChordQuality::Major
    }
}

/// Whether a key string (`C`, `Am`, `F#m`...) denotes a minor key
pub fn is_minor_key(key: &str) -> bool {
    let root = root_text(key);
    is_minor_suffix(key.get(root.len()..).unwrap_or(""))
}

/// A parsed chord symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordSymbol {
    text: String,
    root: String,
    semitone: u8,
    quality: ChordQuality,
    suffix: String,
    bass: Option<String>,
}

impl ChordSymbol {
    pub fn parse(symbol: &str) -> Self {
        let (root, semitone) = parse_root(symbol);
        let bass = match symbol.find('/') {
            Some(i) if i > 0 => Some(symbol[i + 1..].to_string()),
            _ => None,
        };

        ChordSymbol {
            text: symbol.to_string(),
            root: root.to_string(),
            semitone,
            quality: chord_quality(symbol),
            suffix: suffix_after_root(symbol).to_string(),
            bass,
        }
    }

    /// The symbol exactly as given
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Semitone of the root, 0 when the root is not a known spelling
    pub fn semitone(&self) -> u8 {
        self.semitone
    }

    /// True when the root spelling is in the alias table
    pub fn has_known_root(&self) -> bool {
        pitch_class(&self.root).is_some()
    }

    pub fn quality(&self) -> ChordQuality {
        self.quality
    }

    /// Extension text after the root, e.g. `m7` for `Am7/G`
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Slash bass note, e.g. `F#` for `D/F#`
    pub fn bass(&self) -> Option<&str> {
        self.bass.as_deref()
    }

    /// Semitone distance from a key root, always in 0..=11
    pub fn interval_from(&self, key_semitone: u8) -> u8 {
        (self.semitone + 12 - key_semitone % 12) % 12
    }
}

impl FromStr for ChordSymbol {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ChordSymbol::parse(s))
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_with_accidentals() {
        assert_eq!(parse_root("C"), ("C", 0));
        assert_eq!(parse_root("F#m7"), ("F#", 6));
        assert_eq!(parse_root("Bbmaj7"), ("Bb", 10));
        assert_eq!(parse_root("Db"), ("Db", 1));
        assert_eq!(parse_root("D#"), ("D#", 3));
    }

    #[test]
    fn test_slash_bass_is_ignored_for_root() {
        assert_eq!(parse_root("D/F#"), ("D", 2));
        assert_eq!(parse_root("Am/G"), ("A", 9));
    }

    #[test]
    fn test_malformed_roots_default_to_c() {
        assert_eq!(parse_root(""), ("C", 0));
        assert_eq!(parse_root("Hm").1, 0);
        assert_eq!(parse_root("/G").1, 0);
        assert_eq!(parse_root("xyz").1, 0);
    }

    #[test]
    fn test_quality() {
        assert_eq!(chord_quality("Am"), ChordQuality::Minor);
        assert_eq!(chord_quality("Am7"), ChordQuality::Minor);
        assert_eq!(chord_quality("Bm7b5"), ChordQuality::Minor);
        assert_eq!(chord_quality("C#m"), ChordQuality::Minor);
        assert_eq!(chord_quality("Cmaj7"), ChordQuality::Major);
        assert_eq!(chord_quality("G7"), ChordQuality::Major);
        assert_eq!(chord_quality("E5"), ChordQuality::Major);
        assert_eq!(chord_quality("D/F#"), ChordQuality::Major);
        assert_eq!(chord_quality("Am/G"), ChordQuality::Minor);
        assert_eq!(chord_quality(""), ChordQuality::Major);
    }

    #[test]
    fn test_minor_keys() {
        assert!(is_minor_key("Am"));
        assert!(is_minor_key("F#m"));
        assert!(!is_minor_key("C"));
        assert!(!is_minor_key("Bb"));
        assert!(!is_minor_key("Cmaj"));
    }

    #[test]
    fn test_chord_symbol_parts() {
        let chord = ChordSymbol::parse("Am7/G");
        assert_eq!(chord.root(), "A");
        assert_eq!(chord.semitone(), 9);
        assert_eq!(chord.suffix(), "m7");
        assert_eq!(chord.bass(), Some("G"));
        assert_eq!(chord.quality(), ChordQuality::Minor);
        assert_eq!(chord.to_string(), "Am7/G");
        assert_eq!(chord.interval_from(0), 9);
        assert_eq!(chord.interval_from(11), 10);
    }

    #[test]
    fn test_unknown_root_is_flagged() {
        assert!(ChordSymbol::parse("Bb").has_known_root());
        assert!(!ChordSymbol::parse("Hm").has_known_root());
    }
}
