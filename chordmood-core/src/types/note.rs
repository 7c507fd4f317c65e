//! Note names and pitch classes
//!
//! Note names are octave-agnostic spellings like `C`, `F#` or `Bb`. Every
//! spelling resolves through an explicit alias table so that enharmonic
//! sharps and flats land on the same chromatic pitch class (0 = C ... 11 = B).

/// Frequency of C4 (middle C) in Hz, A4 = 440Hz tuning
pub const REFERENCE_C4: f32 = 261.63;

/// Spelling -> pitch class. Sharps and flats of the same pitch share a value.
const NOTE_ALIASES: [(&str, u8); 17] = [
    ("C", 0),
    ("C#", 1),
    ("Db", 1),
    ("D", 2),
    ("D#", 3),
    ("Eb", 3),
    ("E", 4),
    ("F", 5),
    ("F#", 6),
    ("Gb", 6),
    ("G", 7),
    ("G#", 8),
    ("Ab", 8),
    ("A", 9),
    ("A#", 10),
    ("Bb", 10),
    ("B", 11),
];

/// Look up the chromatic pitch class (0-11) of a note spelling
///
/// Returns `None` for spellings outside the alias table (e.g. `Cb`, `E#`,
/// lower-case names).
pub fn pitch_class(name: &str) -> Option<u8> {
    NOTE_ALIASES
        .iter()
        .find(|(spelling, _)| *spelling == name)
        .map(|&(_, pc)| pc)
}

/// Frequency of a note name in the reference octave (C4 up to B4)
///
/// `f = 261.63 * 2^(pc / 12)`
pub fn reference_frequency(name: &str) -> Option<f32> {
    pitch_class(name).map(frequency_of_pitch_class)
}

/// Frequency of a pitch class in the reference octave
pub fn frequency_of_pitch_class(pitch_class: u8) -> f32 {
    REFERENCE_C4 * 2.0_f32.powf((pitch_class % 12) as f32 / 12.0)
}

/// Preferred display spelling for a pitch class
pub fn spelling(pitch_class: u8, prefer_flats: bool) -> &'static str {
    match (pitch_class % 12, prefer_flats) {
        (0, _) => "C",
        (1, false) => "C#",
        (1, true) => "Db",
        (2, _) => "D",
        (3, false) => "D#",
        (3, true) => "Eb",
        (4, _) => "E",
        (5, _) => "F",
        (6, false) => "F#",
        (6, true) => "Gb",
        (7, _) => "G",
        (8, false) => "G#",
        (8, true) => "Ab",
        (9, _) => "A",
        (10, false) => "A#",
        (10, true) => "Bb",
        _ => "B",
    }
}
