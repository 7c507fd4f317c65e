//! Song and progression records

use crate::catalog::SongCatalog;
use crate::types::roman_pattern::RomanPattern;
use std::fmt;

/// A known song that uses a given harmonic pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SongEntry {
    pub title: String,
    pub artist: String,
}

impl SongEntry {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }
}

impl fmt::Display for SongEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)
    }
}

/// Difficulty rating attached to a generated progression (1-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum Complexity {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Complexity {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Complexity::Beginner),
            2 => Some(Complexity::Intermediate),
            3 => Some(Complexity::Advanced),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Complexity::Beginner => 1,
            Complexity::Intermediate => 2,
            Complexity::Advanced => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Complexity::Beginner => "Beginner",
            Complexity::Intermediate => "Intermediate",
            Complexity::Advanced => "Advanced",
        }
    }
}

impl TryFrom<u8> for Complexity {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Complexity::from_level(level).ok_or_else(|| format!("complexity must be 1-3, got {}", level))
    }
}

impl From<Complexity> for u8 {
    fn from(complexity: Complexity) -> u8 {
        complexity.level()
    }
}

/// A chord progression as delivered by the mood-based generator
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progression {
    pub chords: Vec<String>,
    pub key: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scale: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub complexity: Complexity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub theory: String,
}

impl Progression {
    pub fn new<S: Into<String>>(chords: impl IntoIterator<Item = S>, key: impl Into<String>) -> Self {
        Self {
            chords: chords.into_iter().map(Into::into).collect(),
            key: key.into(),
            scale: String::new(),
            complexity: Complexity::default(),
            theory: String::new(),
        }
    }

    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn pattern(&self) -> RomanPattern {
        RomanPattern::analyze(&self.chords, &self.key)
    }

    /// Songs from the built-in catalog that share this progression's shape
    pub fn similar_songs(&self) -> Vec<SongEntry> {
        SongCatalog::builtin().find_similar_songs(&self.chords, &self.key)
    }
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (key of {})", self.chords.join(" → "), self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_levels() {
        assert_eq!(Complexity::from_level(2), Some(Complexity::Intermediate));
        assert_eq!(Complexity::from_level(0), None);
        assert_eq!(Complexity::Advanced.level(), 3);
        assert_eq!(Complexity::Beginner.label(), "Beginner");
        assert!(Complexity::try_from(4).is_err());
    }

    #[test]
    fn test_progression_pattern_and_songs() {
        let progression = Progression::new(["C", "G", "Am", "F"], "C");
        assert_eq!(progression.pattern().to_string(), "I-V-vi-IV");
        assert!(progression
            .similar_songs()
            .iter()
            .any(|song| song.title == "Let It Be"));
        assert_eq!(progression.to_string(), "C → G → Am → F (key of C)");
    }
}
