//! Built-in chord voicing tables
//!
//! Guitar shapes list strings low E to high E (`-1` muted, `0` open). Each
//! chord name maps to one or more shapes; the first is the default. Piano
//! voicings are octave-agnostic note sets, and double as the pitch source for
//! audio playback on every instrument.

use crate::types::voicing::{GuitarVoicing, PianoVoicing};
use std::collections::HashMap;
use std::sync::OnceLock;

type GuitarShape = ([i8; 6], u8, &'static [u8]);

#[rustfmt::skip]
const GUITAR_CHORDS: &[(&str, &[GuitarShape])] = &[
    ("A", &[([-1, 0, 2, 2, 2, 0], 1, &[])]),
    ("A5", &[([-1, 0, 2, 2, -1, -1], 1, &[])]),
    (
        "A7",
        &[
            ([-1, 0, 2, 0, 2, 0], 1, &[]),
            ([5, 7, 5, 6, 5, 5], 5, &[5]),
        ],
    ),
    ("Ab", &[([4, 6, 6, 5, 4, 4], 4, &[4])]),
    ("Am", &[([-1, 0, 2, 2, 1, 0], 1, &[])]),
    ("Am/G", &[([3, 0, 2, 2, 1, 0], 1, &[])]),
    (
        "Am7",
        &[
            ([-1, 0, 2, 0, 1, 0], 1, &[]),
            ([5, 7, 5, 5, 5, 5], 5, &[5]),
        ],
    ),
    (
        "Amaj7",
        &[
            ([-1, 0, 2, 1, 2, 0], 1, &[]),
            ([-1, -1, 6, 6, 5, 4], 4, &[]),
        ],
    ),
    ("B", &[([-1, 2, 4, 4, 4, 2], 1, &[2])]),
    (
        "B7",
        &[
            ([-1, 2, 1, 2, 0, 2], 1, &[]),
            ([7, 9, 7, 8, 7, 7], 7, &[7]),
        ],
    ),
    ("Bb", &[([-1, 1, 3, 3, 3, 1], 1, &[1])]),
    (
        "Bbmaj7",
        &[
            ([-1, 1, 3, 2, 3, 1], 1, &[1]),
            ([-1, -1, 3, 2, 3, 1], 1, &[]),
        ],
    ),
    (
        "Bm",
        &[
            ([-1, 2, 4, 4, 3, 2], 1, &[2]),
            ([7, 9, 9, 7, 7, 7], 7, &[7]),
        ],
    ),
    (
        "Bm7",
        &[
            ([-1, 2, 4, 2, 3, 2], 1, &[2]),
            ([7, 9, 7, 7, 7, 7], 7, &[7]),
        ],
    ),
    (
        "Bm7b5",
        &[
            ([-1, 2, 3, 2, 3, -1], 1, &[]),
            ([7, 8, 7, 7, -1, -1], 7, &[]),
        ],
    ),
    ("C", &[([-1, 3, 2, 0, 1, 0], 1, &[])]),
    (
        "C#m",
        &[
            ([-1, 4, 6, 6, 5, 4], 4, &[4]),
            ([9, 11, 11, 9, 9, 9], 9, &[9]),
        ],
    ),
    (
        "C#m7",
        &[
            ([-1, 4, 6, 4, 5, 4], 4, &[4]),
            ([9, 11, 9, 9, 9, 9], 9, &[9]),
        ],
    ),
    ("C5", &[([-1, 3, 5, 5, -1, -1], 3, &[])]),
    ("Cm", &[([-1, 3, 5, 5, 4, 3], 3, &[3])]),
    (
        "Cmaj7",
        &[
            ([-1, 3, 2, 0, 0, 0], 1, &[]),
            ([-1, 3, 5, 4, 5, 3], 3, &[3]),
        ],
    ),
    ("D", &[([-1, -1, 0, 2, 3, 2], 1, &[])]),
    ("D/F#", &[([2, -1, 0, 2, 3, 2], 1, &[])]),
    ("D5", &[([-1, -1, 0, 2, 3, -1], 1, &[])]),
    (
        "D7",
        &[
            ([-1, -1, 0, 2, 1, 2], 1, &[]),
            ([-1, 5, 7, 5, 7, 5], 5, &[5]),
        ],
    ),
    ("Dm", &[([-1, -1, 0, 2, 3, 1], 1, &[])]),
    (
        "Dm7",
        &[
            ([-1, -1, 0, 2, 1, 1], 1, &[]),
            ([-1, 5, 7, 5, 6, 5], 5, &[5]),
        ],
    ),
    (
        "Dm9",
        &[
            ([-1, -1, 0, 2, 1, 0], 1, &[]),
            ([-1, 5, 3, 5, 5, 5], 3, &[]),
        ],
    ),
    (
        "Dmaj7",
        &[
            ([-1, -1, 0, 2, 2, 2], 1, &[]),
            ([-1, 5, 4, 6, 5, -1], 4, &[]),
        ],
    ),
    ("E", &[([0, 2, 2, 1, 0, 0], 1, &[])]),
    ("E5", &[([0, 2, 2, -1, -1, -1], 1, &[])]),
    (
        "E7",
        &[
            ([0, 2, 0, 1, 0, 0], 1, &[]),
            ([-1, 7, 9, 7, 9, 7], 7, &[7]),
        ],
    ),
    ("Eb", &[([-1, -1, 1, 3, 4, 3], 1, &[])]),
    ("Em", &[([0, 2, 2, 0, 0, 0], 1, &[])]),
    (
        "Em7",
        &[
            ([0, 2, 0, 0, 0, 0], 1, &[]),
            ([-1, 7, 9, 7, 8, 7], 7, &[7]),
        ],
    ),
    (
        "Em9",
        &[
            ([0, 2, 0, 0, 0, 2], 1, &[]),
            ([-1, 7, 5, 7, 7, 7], 5, &[]),
        ],
    ),
    ("F", &[([1, 3, 3, 2, 1, 1], 1, &[1])]),
    (
        "F#7",
        &[
            ([2, 4, 2, 3, 2, 2], 2, &[2]),
            ([-1, -1, 4, 3, 2, 0], 1, &[]),
        ],
    ),
    (
        "F#m",
        &[
            ([2, 4, 4, 2, 2, 2], 2, &[2]),
            ([-1, -1, 4, 2, 2, 2], 2, &[2]),
        ],
    ),
    (
        "F#m7",
        &[
            ([2, 4, 2, 2, 2, 2], 2, &[2]),
            ([-1, -1, 2, 2, 2, 2], 2, &[2]),
        ],
    ),
    ("Fm", &[([1, 3, 3, 1, 1, 1], 1, &[1])]),
    (
        "Fmaj7",
        &[
            ([-1, -1, 3, 2, 1, 0], 1, &[]),
            ([1, 0, 2, 2, 1, 0], 1, &[]),
        ],
    ),
    ("G", &[([3, 2, 0, 0, 0, 3], 1, &[])]),
    (
        "G7",
        &[
            ([3, 2, 0, 0, 0, 1], 1, &[]),
            ([3, 5, 3, 4, 3, 3], 3, &[3]),
        ],
    ),
    (
        "Gm7",
        &[
            ([3, 5, 3, 3, 3, 3], 3, &[3]),
            ([-1, -1, 3, 3, 3, 3], 3, &[3]),
        ],
    ),
    (
        "Gmaj7",
        &[
            ([3, 2, 0, 0, 0, 2], 1, &[]),
            ([-1, -1, 5, 4, 3, 2], 2, &[]),
        ],
    ),
];

const PIANO_CHORDS: &[(&str, &[&str])] = &[
    ("A", &["A", "C#", "E"]),
    ("A5", &["A", "E"]),
    ("A7", &["A", "C#", "E", "G"]),
    ("Ab", &["Ab", "C", "Eb"]),
    ("Am", &["A", "C", "E"]),
    ("Am/G", &["G", "A", "C", "E"]),
    ("Am7", &["A", "C", "E", "G"]),
    ("Amaj7", &["A", "C#", "E", "G#"]),
    ("B", &["B", "D#", "F#"]),
    ("B7", &["B", "D#", "F#", "A"]),
    ("Bb", &["Bb", "D", "F"]),
    ("Bbmaj7", &["Bb", "D", "F", "A"]),
    ("Bm", &["B", "D", "F#"]),
    ("Bm7", &["B", "D", "F#", "A"]),
    ("Bm7b5", &["B", "D", "F", "A"]),
    ("C", &["C", "E", "G"]),
    ("C#m", &["C#", "E", "G#"]),
    ("C#m7", &["C#", "E", "G#", "B"]),
    ("C5", &["C", "G"]),
    ("Cm", &["C", "Eb", "G"]),
    ("Cmaj7", &["C", "E", "G", "B"]),
    ("D", &["D", "F#", "A"]),
    ("D/F#", &["F#", "D", "A"]),
    ("D5", &["D", "A"]),
    ("D7", &["D", "F#", "A", "C"]),
    ("Dm", &["D", "F", "A"]),
    ("Dm7", &["D", "F", "A", "C"]),
    ("Dm9", &["D", "F", "A", "C", "E"]),
    ("Dmaj7", &["D", "F#", "A", "C#"]),
    ("E", &["E", "G#", "B"]),
    ("E5", &["E", "B"]),
    ("E7", &["E", "G#", "B", "D"]),
    ("Eb", &["Eb", "G", "Bb"]),
    ("Em", &["E", "G", "B"]),
    ("Em7", &["E", "G", "B", "D"]),
    ("Em9", &["E", "G", "B", "D", "F#"]),
    ("F", &["F", "A", "C"]),
    ("F#7", &["F#", "A#", "C#", "E"]),
    ("F#m", &["F#", "A", "C#"]),
    ("F#m7", &["F#", "A", "C#", "E"]),
    ("Fm", &["F", "Ab", "C"]),
    ("Fmaj7", &["F", "A", "C", "E"]),
    ("G", &["G", "B", "D"]),
    ("G7", &["G", "B", "D", "F"]),
    ("Gm7", &["G", "Bb", "D", "F"]),
    ("Gmaj7", &["G", "B", "D", "F#"]),
];

/// Chord name -> guitar shapes and piano note set
#[derive(Debug, Clone, Default)]
pub struct VoicingLibrary {
    guitar: HashMap<String, Vec<GuitarVoicing>>,
    piano: HashMap<String, PianoVoicing>,
}

impl VoicingLibrary {
    /// An empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared built-in tables
    pub fn builtin() -> &'static VoicingLibrary {
        static BUILTIN: OnceLock<VoicingLibrary> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut library = VoicingLibrary::new();
            for (name, shapes) in GUITAR_CHORDS {
                let voicings = shapes
                    .iter()
                    .map(|(strings, start_fret, barres)| GuitarVoicing {
                        strings: *strings,
                        start_fret: *start_fret,
                        barres: barres.to_vec(),
                    })
                    .collect();
                library.insert_guitar(*name, voicings);
            }
            for (name, notes) in PIANO_CHORDS {
                library.insert_piano(*name, PianoVoicing::new(notes.iter().copied()));
            }
            library
        })
    }

    pub fn insert_guitar(&mut self, name: impl Into<String>, voicings: Vec<GuitarVoicing>) {
        self.guitar.insert(name.into(), voicings);
    }

    pub fn insert_piano(&mut self, name: impl Into<String>, voicing: PianoVoicing) {
        self.piano.insert(name.into(), voicing);
    }

    /// All guitar shapes for a chord, default first; empty when unknown
    pub fn guitar(&self, chord: &str) -> &[GuitarVoicing] {
        self.guitar.get(chord).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn default_guitar(&self, chord: &str) -> Option<&GuitarVoicing> {
        self.guitar(chord).first()
    }

    pub fn piano(&self, chord: &str) -> Option<&PianoVoicing> {
        self.piano.get(chord)
    }

    /// Note names used to sound `chord`, for any instrument
    pub fn notes_for(&self, chord: &str) -> Option<&[String]> {
        self.piano(chord).map(|voicing| voicing.notes.as_slice())
    }

    /// Every chord name with at least one voicing, sorted
    pub fn chord_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .guitar
            .keys()
            .chain(self.piano.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn contains(&self, chord: &str) -> bool {
        self.guitar.contains_key(chord) || self.piano.contains_key(chord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::note::pitch_class;
    use crate::types::voicing::MUTED;

    #[test]
    fn test_builtin_tables_cover_same_chords() {
        let library = VoicingLibrary::builtin();
        assert_eq!(library.chord_names().len(), 46);
        for name in library.chord_names() {
            assert!(!library.guitar(name).is_empty(), "no guitar shape for {}", name);
            assert!(library.piano(name).is_some(), "no piano notes for {}", name);
        }
    }

    #[test]
    fn test_piano_notes_are_known_spellings() {
        let library = VoicingLibrary::builtin();
        for name in library.chord_names() {
            for note in library.notes_for(name).unwrap() {
                assert!(pitch_class(note).is_some(), "{} in {}", note, name);
            }
        }
    }

    #[test]
    fn test_default_shape_is_first() {
        let library = VoicingLibrary::builtin();
        let am7 = library.guitar("Am7");
        assert_eq!(am7.len(), 2);
        assert_eq!(library.default_guitar("Am7"), am7.first());
        assert_eq!(am7[0].strings, [MUTED, 0, 2, 0, 1, 0]);
        assert_eq!(am7[1].barres, vec![5]);
    }

    #[test]
    fn test_slash_chord_lookup() {
        let library = VoicingLibrary::builtin();
        let notes = library.notes_for("D/F#").unwrap();
        assert_eq!(notes, ["F#", "D", "A"]);
        assert_eq!(library.guitar("D/F#")[0].strings[0], 2);
    }

    #[test]
    fn test_unknown_chord() {
        let library = VoicingLibrary::builtin();
        assert!(library.guitar("Xm13").is_empty());
        assert!(library.notes_for("Xm13").is_none());
        assert!(!library.contains("Xm13"));
    }
}
