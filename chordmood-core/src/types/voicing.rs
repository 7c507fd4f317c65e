//! Instrument voicings for a chord name

/// Fret value marking a string that is not played
pub const MUTED: i8 = -1;

/// A guitar fingering, strings ordered low E to high E
///
/// Each entry is `-1` (muted), `0` (open) or a fret number on the neck.
/// `start_fret` is the lowest fret shown in a diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuitarVoicing {
    pub strings: [i8; 6],
    #[cfg_attr(feature = "serde", serde(rename = "startFret"))]
    pub start_fret: u8,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub barres: Vec<u8>,
}

impl GuitarVoicing {
    pub fn new(strings: [i8; 6], start_fret: u8) -> Self {
        Self {
            strings,
            start_fret,
            barres: Vec::new(),
        }
    }

    pub fn with_barre(mut self, fret: u8) -> Self {
        self.barres.push(fret);
        self
    }

    pub fn is_muted(&self, string: usize) -> bool {
        self.strings.get(string).map_or(true, |&fret| fret == MUTED)
    }

    /// Number of strings that sound
    pub fn sounding_strings(&self) -> usize {
        self.strings.iter().filter(|&&fret| fret != MUTED).count()
    }

    /// Highest fretted position, 0 for all-open shapes
    pub fn highest_fret(&self) -> u8 {
        self.strings
            .iter()
            .filter(|&&fret| fret > 0)
            .map(|&fret| fret as u8)
            .max()
            .unwrap_or(0)
    }
}

/// An octave-agnostic set of note names making up a chord
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PianoVoicing {
    pub notes: Vec<String>,
}

impl PianoVoicing {
    pub fn new<S: Into<String>>(notes: impl IntoIterator<Item = S>) -> Self {
        Self {
            notes: notes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guitar_voicing_queries() {
        let barre_f = GuitarVoicing::new([1, 3, 3, 2, 1, 1], 1).with_barre(1);
        assert_eq!(barre_f.barres, vec![1]);
        assert_eq!(barre_f.sounding_strings(), 6);
        assert_eq!(barre_f.highest_fret(), 3);

        let open_d = GuitarVoicing::new([MUTED, MUTED, 0, 2, 3, 2], 1);
        assert!(open_d.is_muted(0));
        assert!(!open_d.is_muted(2));
        assert!(open_d.is_muted(6));
        assert_eq!(open_d.sounding_strings(), 4);
    }

    #[test]
    fn test_piano_voicing() {
        let voicing = PianoVoicing::new(["A", "C", "E"]);
        assert_eq!(voicing.note_count(), 3);
        assert_eq!(voicing.notes[1], "C");
    }
}
