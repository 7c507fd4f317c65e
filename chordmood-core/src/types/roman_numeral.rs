// chordmood-core/src/types/roman_numeral.rs
use crate::types::chord_symbol::ChordQuality;
use anyhow::{Result, anyhow};
use std::fmt;
use std::str::FromStr;

/// Diatonic scale degree, I through VII
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScaleDegree {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
}

impl ScaleDegree {
    /// Chromatic distance (0-11) to the nearest scale degree, rounding down
    /// on the halfway points 1 and 6.
    pub fn from_semitones(distance: u8) -> Self {
        match distance % 12 {
            0 | 1 => ScaleDegree::I,
            2 => ScaleDegree::II,
            3 | 4 => ScaleDegree::III,
            5 | 6 => ScaleDegree::IV,
            7 => ScaleDegree::V,
            8 | 9 => ScaleDegree::VI,
            _ => ScaleDegree::VII,
        }
    }

    /// Degree number, 1-7
    pub fn number(&self) -> u8 {
        match self {
            ScaleDegree::I => 1,
            ScaleDegree::II => 2,
            ScaleDegree::III => 3,
            ScaleDegree::IV => 4,
            ScaleDegree::V => 5,
            ScaleDegree::VI => 6,
            ScaleDegree::VII => 7,
        }
    }

    pub fn numeral(&self) -> &'static str {
        match self {
            ScaleDegree::I => "I",
            ScaleDegree::II => "II",
            ScaleDegree::III => "III",
            ScaleDegree::IV => "IV",
            ScaleDegree::V => "V",
            ScaleDegree::VI => "VI",
            ScaleDegree::VII => "VII",
        }
    }

    fn from_numeral(upper: &str) -> Option<Self> {
        match upper {
            "I" => Some(ScaleDegree::I),
            "II" => Some(ScaleDegree::II),
            "III" => Some(ScaleDegree::III),
            "IV" => Some(ScaleDegree::IV),
            "V" => Some(ScaleDegree::V),
            "VI" => Some(ScaleDegree::VI),
            "VII" => Some(ScaleDegree::VII),
            _ => None,
        }
    }
}

/// Semitone distances outside the major scale
const MAJOR_CHROMATIC: [u8; 5] = [1, 3, 6, 8, 10];
/// Semitone distances outside the natural minor scale
const MINOR_CHROMATIC: [u8; 5] = [1, 4, 6, 9, 11];

/// Whether a semitone distance from the tonic falls outside the key's
/// diatonic collection
pub fn is_chromatic(distance: u8, key_is_minor: bool) -> bool {
    let table = if key_is_minor {
        &MINOR_CHROMATIC
    } else {
        &MAJOR_CHROMATIC
    };
    table.contains(&(distance % 12))
}

/// A roman numeral relative to a key: degree, case (quality) and an
/// optional flat for chromatic steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RomanNumeral {
    pub degree: ScaleDegree,
    pub quality: ChordQuality,
    pub flat: bool,
}

impl RomanNumeral {
    pub fn new(degree: ScaleDegree, quality: ChordQuality, flat: bool) -> Self {
        Self {
            degree,
            quality,
            flat,
        }
    }
}

/// Convert a semitone distance from the key root into a roman numeral
///
/// `distance` is `(chord_root - key_root + 12) % 12`. The numeral gets a
/// `b` prefix when the distance is chromatic for the key's quality, and is
/// lower-case when the chord is minor.
pub fn interval_to_roman(distance: u8, quality: ChordQuality, key_is_minor: bool) -> RomanNumeral {
    RomanNumeral {
        degree: ScaleDegree::from_semitones(distance),
        quality,
        flat: is_chromatic(distance, key_is_minor),
    }
}

impl fmt::Display for RomanNumeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.flat {
            write!(f, "b")?;
        }
        match self.quality {
            ChordQuality::Major => write!(f, "{}", self.degree.numeral()),
            ChordQuality::Minor => write!(f, "{}", self.degree.numeral().to_lowercase()),
        }
    }
}

impl FromStr for RomanNumeral {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (flat, body) = match s.strip_prefix('b') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let quality = if !body.is_empty() && body.chars().all(|c| c.is_ascii_uppercase()) {
            ChordQuality::Major
        } else if !body.is_empty() && body.chars().all(|c| c.is_ascii_lowercase()) {
            ChordQuality::Minor
        } else {
            return Err(anyhow!("Invalid roman numeral: '{}'", s));
        };

        let degree = ScaleDegree::from_numeral(&body.to_ascii_uppercase())
            .ok_or_else(|| anyhow!("Invalid roman numeral: '{}'", s))?;

        Ok(RomanNumeral {
            degree,
            quality,
            flat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_table() {
        let expected = [1, 1, 2, 3, 3, 4, 4, 5, 6, 6, 7, 7];
        for (distance, degree) in expected.iter().enumerate() {
            assert_eq!(
                ScaleDegree::from_semitones(distance as u8).number(),
                *degree,
                "distance {}",
                distance
            );
        }
    }

    #[test]
    fn test_major_key_numerals() {
        let numeral = |d, q| interval_to_roman(d, q, false).to_string();
        assert_eq!(numeral(0, ChordQuality::Major), "I");
        assert_eq!(numeral(2, ChordQuality::Minor), "ii");
        assert_eq!(numeral(4, ChordQuality::Minor), "iii");
        assert_eq!(numeral(5, ChordQuality::Major), "IV");
        assert_eq!(numeral(7, ChordQuality::Major), "V");
        assert_eq!(numeral(9, ChordQuality::Minor), "vi");
        assert_eq!(numeral(10, ChordQuality::Major), "bVII");
        assert_eq!(numeral(8, ChordQuality::Major), "bVI");
        assert_eq!(numeral(1, ChordQuality::Major), "bI");
        assert_eq!(numeral(6, ChordQuality::Major), "bIV");
    }

    #[test]
    fn test_minor_key_numerals() {
        let numeral = |d, q| interval_to_roman(d, q, true).to_string();
        assert_eq!(numeral(0, ChordQuality::Minor), "i");
        assert_eq!(numeral(3, ChordQuality::Major), "III");
        assert_eq!(numeral(5, ChordQuality::Minor), "iv");
        assert_eq!(numeral(8, ChordQuality::Major), "VI");
        assert_eq!(numeral(10, ChordQuality::Major), "VII");
        assert_eq!(numeral(4, ChordQuality::Major), "bIII");
        assert_eq!(numeral(11, ChordQuality::Major), "bVII");
        assert_eq!(numeral(9, ChordQuality::Major), "bVI");
    }

    #[test]
    fn test_parse_numerals() {
        let vi: RomanNumeral = "vi".parse().unwrap();
        assert_eq!(vi.degree, ScaleDegree::VI);
        assert_eq!(vi.quality, ChordQuality::Minor);
        assert!(!vi.flat);

        let flat_seven: RomanNumeral = "bVII".parse().unwrap();
        assert_eq!(flat_seven.degree, ScaleDegree::VII);
        assert!(flat_seven.flat);
        assert_eq!(flat_seven.to_string(), "bVII");

        assert!("Vi".parse::<RomanNumeral>().is_err());
        assert!("VIII".parse::<RomanNumeral>().is_err());
        assert!("".parse::<RomanNumeral>().is_err());
        assert!("b".parse::<RomanNumeral>().is_err());
    }
}
