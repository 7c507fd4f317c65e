//! WASM bindings for chordmood-core
//!
//! Exposes pattern analysis, song lookup and voicing tables to JavaScript.
//! Results cross the boundary as plain JS objects via serde-wasm-bindgen.

#[cfg(feature = "wasm")]
use crate::types::voicing::{GuitarVoicing, PianoVoicing};
#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

use crate::analysis::MatchKind;
use crate::catalog::SongCatalog;
use crate::types::song::SongEntry;
use crate::voicings::VoicingLibrary;

/// Similar-song lookup result in the shape the web front end consumes
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SimilarSongs {
    pub pattern: String,
    pub matched_pattern: Option<String>,
    pub exact: bool,
    pub songs: Vec<SongEntry>,
}

/// Look up similar songs and describe how they were found
pub fn similar_songs_report(chords: &[String], key: &str) -> SimilarSongs {
    let catalog = SongCatalog::builtin();
    match catalog.find_match(chords, key) {
        Some(found) => SimilarSongs {
            exact: found.kind == MatchKind::Exact,
            matched_pattern: Some(found.matched_pattern),
            pattern: found.full_pattern,
            songs: found.songs.to_vec(),
        },
        None => SimilarSongs {
            pattern: crate::types::roman_pattern::to_pattern(chords, key),
            matched_pattern: None,
            exact: false,
            songs: Vec::new(),
        },
    }
}

/// Number of chords the voicing tables know about
pub fn known_chord_count() -> usize {
    VoicingLibrary::builtin().chord_names().len()
}

#[cfg(feature = "wasm")]
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordVoicingsJS {
    pub name: String,
    pub guitar: Vec<GuitarVoicing>,
    pub piano: Option<PianoVoicing>,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = toPattern)]
pub fn to_pattern(chords: Vec<String>, key: &str) -> String {
    crate::types::roman_pattern::to_pattern(&chords, key)
}

#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = findSimilarSongs)]
pub fn find_similar_songs(chords: Vec<String>, key: &str) -> JsValue {
    let songs = crate::analysis::find_similar_songs(&chords, key);
    serde_wasm_bindgen::to_value(&songs).unwrap_or(JsValue::NULL)
}

#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = similarSongsReport)]
pub fn similar_songs_report_js(chords: Vec<String>, key: &str) -> JsValue {
    serde_wasm_bindgen::to_value(&similar_songs_report(&chords, key)).unwrap_or(JsValue::NULL)
}

#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = chordVoicings)]
pub fn chord_voicings(name: &str) -> JsValue {
    let library = VoicingLibrary::builtin();
    if !library.contains(name) {
        return JsValue::NULL;
    }
    let voicings = ChordVoicingsJS {
        name: name.to_string(),
        guitar: library.guitar(name).to_vec(),
        piano: library.piano(name).cloned(),
    };
    serde_wasm_bindgen::to_value(&voicings).unwrap_or(JsValue::NULL)
}

#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = chordNames)]
pub fn chord_names() -> JsValue {
    let names = VoicingLibrary::builtin().chord_names();
    serde_wasm_bindgen::to_value(&names).unwrap_or(JsValue::NULL)
}
