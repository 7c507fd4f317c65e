//! Similar-song lookup
//!
//! A progression is reduced to its roman numeral pattern and looked up in a
//! `SongCatalog`. Ranking is fixed:
//!
//! 1. the full pattern, exactly;
//! 2. any contiguous 4-numeral window, leftmost first;
//! 3. any contiguous 3-numeral window, leftmost first.
//!
//! Two-numeral windows are never tried; they match too much to mean anything.

use crate::catalog::SongCatalog;
use crate::types::roman_pattern::RomanPattern;
use crate::types::song::SongEntry;

/// Window lengths tried after the full pattern misses, most specific first
pub const WINDOW_LENGTHS: [usize; 2] = [4, 3];

/// How a catalog entry was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The whole progression matched
    Exact,
    /// A contiguous window of `len` chords starting at chord `start`
    Window { start: usize, len: usize },
}

/// A successful catalog lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch<'a> {
    /// Pattern of the whole progression
    pub full_pattern: String,
    /// Catalog key that matched
    pub matched_pattern: String,
    pub kind: MatchKind,
    pub songs: &'a [SongEntry],
}

impl SongCatalog {
    /// Find the best catalog entry for a progression in `key`
    pub fn find_match<S: AsRef<str>>(&self, chords: &[S], key: &str) -> Option<PatternMatch<'_>> {
        let pattern = RomanPattern::analyze(chords, key);
        let full_pattern = pattern.to_string();

        if let Some(songs) = self.get(&full_pattern) {
            return Some(PatternMatch {
                matched_pattern: full_pattern.clone(),
                full_pattern,
                kind: MatchKind::Exact,
                songs,
            });
        }

        for len in WINDOW_LENGTHS {
            for (start, window) in pattern.windows(len) {
                let window = window.to_string();
                if let Some(songs) = self.get(&window) {
                    return Some(PatternMatch {
                        full_pattern,
                        matched_pattern: window,
                        kind: MatchKind::Window { start, len },
                        songs,
                    });
                }
            }
        }

        None
    }

    /// Songs sharing the shape of a progression; empty when nothing matches
    pub fn find_similar_songs<S: AsRef<str>>(&self, chords: &[S], key: &str) -> Vec<SongEntry> {
        self.find_match(chords, key)
            .map(|found| found.songs.to_vec())
            .unwrap_or_default()
    }
}

/// Songs from the built-in catalog that share the shape of a progression
pub fn find_similar_songs<S: AsRef<str>>(chords: &[S], key: &str) -> Vec<SongEntry> {
    SongCatalog::builtin().find_similar_songs(chords, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(songs: &[SongEntry]) -> Vec<&str> {
        songs.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_exact_match() {
        let found = SongCatalog::builtin()
            .find_match(&["C", "G", "Am", "F"], "C")
            .unwrap();
        assert_eq!(found.kind, MatchKind::Exact);
        assert_eq!(found.matched_pattern, "I-V-vi-IV");
        assert_eq!(found.songs[0].title, "Let It Be");
    }

    #[test]
    fn test_exact_beats_window() {
        // I-V-vi-IV-I is in the catalog, and so is its first window I-V-vi-IV
        let found = SongCatalog::builtin()
            .find_match(&["G", "D", "Em", "C", "G"], "G")
            .unwrap();
        assert_eq!(found.kind, MatchKind::Exact);
        assert_eq!(titles(found.songs), vec!["Let It Be", "She Will Be Loved"]);
    }

    #[test]
    fn test_trailing_four_chord_window() {
        let found = SongCatalog::builtin()
            .find_match(&["Dm", "C", "G", "Am", "F"], "C")
            .unwrap();
        assert_eq!(found.full_pattern, "ii-I-V-vi-IV");
        assert_eq!(found.matched_pattern, "I-V-vi-IV");
        assert_eq!(found.kind, MatchKind::Window { start: 1, len: 4 });
    }

    #[test]
    fn test_four_beats_three() {
        // iii-I-V-vi-IV: V-vi-IV is a 3-window, I-V-vi-IV a 4-window
        let catalog = SongCatalog::from_entries([
            ("V-vi-IV", vec![SongEntry::new("Three", "x")]),
            ("I-V-vi-IV", vec![SongEntry::new("Four", "y")]),
        ]);
        let found = catalog
            .find_match(&["Em", "C", "G", "Am", "F"], "C")
            .unwrap();
        assert_eq!(found.songs[0].title, "Four");
    }

    #[test]
    fn test_leftmost_window_wins() {
        let catalog = SongCatalog::from_entries([
            ("vi-IV-I", vec![SongEntry::new("Right", "x")]),
            ("I-vi-IV", vec![SongEntry::new("Left", "y")]),
        ]);
        let found = catalog
            .find_match(&["C", "Am", "F", "C"], "C")
            .unwrap();
        assert_eq!(found.kind, MatchKind::Window { start: 0, len: 3 });
        assert_eq!(found.songs[0].title, "Left");
    }

    #[test]
    fn test_no_two_chord_fallback() {
        // I-V is in the catalog but two-chord windows never count
        assert!(find_similar_songs(&["Dm", "C", "G", "Em"], "C").is_empty());
        assert_eq!(find_similar_songs(&["C", "G"], "C").len(), 1);
    }

    #[test]
    fn test_empty_progression_has_no_match() {
        assert!(find_similar_songs::<&str>(&[], "C").is_empty());
    }
}
