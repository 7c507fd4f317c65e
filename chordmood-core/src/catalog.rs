//! Song catalog keyed by roman numeral pattern
//!
//! Each pattern maps to songs in relevance order; the first entry is the
//! preferred example. The built-in catalog is loaded once and never mutated.

use crate::types::song::SongEntry;
use std::collections::HashMap;
use std::sync::OnceLock;

#[rustfmt::skip]
const SONGS_BY_PATTERN: &[(&str, &[(&str, &str)])] = &[
    (
        "I-V-vi-IV",
        &[
            ("Let It Be", "The Beatles"),
            ("No Woman No Cry", "Bob Marley"),
            ("Someone Like You", "Adele"),
            ("With or Without You", "U2"),
            ("Photograph", "Ed Sheeran"),
        ],
    ),
    (
        "vi-IV-I-V",
        &[
            ("Numb", "Linkin Park"),
            ("Save Tonight", "Eagle-Eye Cherry"),
            ("Grenade", "Bruno Mars"),
            ("Complicated", "Avril Lavigne"),
        ],
    ),
    (
        "I-vi-IV-V",
        &[
            ("Stand By Me", "Ben E. King"),
            ("Every Breath You Take", "The Police"),
            ("Earth Angel", "The Penguins"),
        ],
    ),
    (
        "IV-I-V-vi",
        &[
            ("Love the Way You Lie", "Eminem ft. Rihanna"),
            ("Apologize", "OneRepublic"),
        ],
    ),
    (
        "I-IV-V",
        &[
            ("Twist and Shout", "The Beatles"),
            ("La Bamba", "Ritchie Valens"),
            ("Wild Thing", "The Troggs"),
            ("Johnny B. Goode", "Chuck Berry"),
        ],
    ),
    (
        "I-IV-V-I",
        &[
            ("Twist and Shout", "The Beatles"),
            ("La Bamba", "Ritchie Valens"),
        ],
    ),
    (
        "I-V-IV",
        &[
            ("Sweet Home Alabama", "Lynyrd Skynyrd"),
            ("Louie Louie", "The Kingsmen"),
        ],
    ),
    (
        "I-IV-vi-V",
        &[
            ("Hey Soul Sister", "Train"),
            ("Where Is the Love?", "Black Eyed Peas"),
        ],
    ),
    (
        "I-vi-ii-V",
        &[
            ("Blue Moon", "Rodgers & Hart"),
            ("Heart and Soul", "Hoagy Carmichael"),
        ],
    ),
    (
        "ii-V-I",
        &[
            ("Fly Me to the Moon", "Frank Sinatra"),
            ("Autumn Leaves", "Jazz Standard"),
        ],
    ),
    ("I-IV-I-V", &[("Born in the USA", "Bruce Springsteen")]),
    (
        "I-V-vi-iii-IV",
        &[
            ("Canon in D", "Pachelbel"),
            ("Graduation", "Vitamin C"),
        ],
    ),
    (
        "i-VII-VI-VII",
        &[
            ("Hit the Road Jack", "Ray Charles"),
            ("Stairway to Heaven", "Led Zeppelin"),
        ],
    ),
    (
        "i-VI-III-VII",
        &[
            ("Zombie", "The Cranberries"),
            ("Boulevard of Broken Dreams", "Green Day"),
            ("Self Esteem", "The Offspring"),
        ],
    ),
    ("i-iv-VII-III", &[("What I've Done", "Linkin Park")]),
    ("i-iv-V", &[("House of the Rising Sun", "The Animals")]),
    ("I-iii-IV-V", &[("Take On Me", "a-ha")]),
    (
        "I-V-vi-IV-I",
        &[
            ("Let It Be", "The Beatles"),
            ("She Will Be Loved", "Maroon 5"),
        ],
    ),
    (
        "I-IV",
        &[
            ("Born in the USA", "Bruce Springsteen"),
            ("Achy Breaky Heart", "Billy Ray Cyrus"),
        ],
    ),
    ("vi-V-IV-V", &[("Running Down a Dream", "Tom Petty")]),
    ("I-V", &[("Achy Breaky Heart", "Billy Ray Cyrus")]),
    (
        "I-bVII-IV",
        &[
            ("Sweet Child O' Mine", "Guns N' Roses"),
            ("Hey Jude", "The Beatles"),
        ],
    ),
    (
        "i-VII-VI-V",
        &[
            ("Sultans of Swing", "Dire Straits"),
            ("Good Riddance", "Green Day"),
        ],
    ),
    ("I-vi-I-V", &[("Unchained Melody", "The Righteous Brothers")]),
    ("i-VI-VII", &[("All Along the Watchtower", "Jimi Hendrix")]),
];

/// Read-only mapping from pattern text (e.g. `I-V-vi-IV`) to songs
#[derive(Debug, Clone, Default)]
pub struct SongCatalog {
    entries: Vec<(String, Vec<SongEntry>)>,
    index: HashMap<String, usize>,
}

impl SongCatalog {
    /// An empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from `(pattern, songs)` pairs
    ///
    /// A pattern given twice keeps its first position and appends songs.
    pub fn from_entries<P, I>(entries: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = (P, Vec<SongEntry>)>,
    {
        let mut catalog = SongCatalog::new();
        for (pattern, songs) in entries {
            catalog.insert(pattern, songs);
        }
        catalog
    }

    /// The shared built-in catalog
    pub fn builtin() -> &'static SongCatalog {
        static BUILTIN: OnceLock<SongCatalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            SongCatalog::from_entries(SONGS_BY_PATTERN.iter().map(|(pattern, songs)| {
                let songs = songs
                    .iter()
                    .map(|(title, artist)| SongEntry::new(*title, *artist))
                    .collect();
                (*pattern, songs)
            }))
        })
    }

    fn insert<P: Into<String>>(&mut self, pattern: P, songs: Vec<SongEntry>) {
        let pattern = pattern.into();
        match self.index.get(&pattern) {
            Some(&i) => self.entries[i].1.extend(songs),
            None => {
                self.index.insert(pattern.clone(), self.entries.len());
                self.entries.push((pattern, songs));
            }
        }
    }

    /// Songs for an exact pattern
    pub fn get(&self, pattern: &str) -> Option<&[SongEntry]> {
        self.index
            .get(pattern)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.index.contains_key(pattern)
    }

    /// Patterns in insertion order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(pattern, _)| pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
