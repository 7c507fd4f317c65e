//! Harmonic analysis commands (analyze, pattern, songs, chords, voicing)

use crate::commands::{CommandContext, CommandResult, parse_progression};
use chordmood_core::types::voicing::{GuitarVoicing, MUTED};
use chordmood_core::{MatchKind, RomanPattern, SongCatalog, SongEntry};
use colored::*;

/// Handle `analyze <chords...> [in <key>]`
pub fn cmd_analyze(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let progression = match parse_progression(args) {
        Ok(p) => p,
        Err(e) => {
            return CommandResult::Error(format!("{}. Usage: analyze <chords...> [in <key>]", e));
        }
    };

    let catalog = SongCatalog::builtin();
    let mut out = String::new();

    match catalog.find_match(&progression.chords, &progression.key) {
        Some(found) => {
            out.push_str(&format!(
                "{} {}\n",
                "Pattern:".green(),
                found.full_pattern.bright_cyan().bold()
            ));
            match found.kind {
                MatchKind::Exact => out.push_str(&format!("{}\n", "Exact match".bright_green())),
                MatchKind::Window { start, len } => out.push_str(&format!(
                    "{} {} (chords {}-{})\n",
                    "Matched section:".yellow(),
                    found.matched_pattern.bright_cyan(),
                    start + 1,
                    start + len
                )),
            }
            out.push_str(&format_songs(found.songs));
        }
        None => {
            let pattern = RomanPattern::analyze(&progression.chords, &progression.key);
            out.push_str(&format!(
                "{} {}\n",
                "Pattern:".green(),
                pattern.to_string().bright_cyan().bold()
            ));
            out.push_str(&"No similar songs found".dimmed().to_string());
        }
    }

    ctx.last_progression = Some(progression.chords);
    CommandResult::Message(out.trim_end().to_string())
}

/// Handle `pattern <chords...> [in <key>]`
pub fn cmd_pattern(args: &str, _ctx: &mut CommandContext) -> CommandResult {
    match parse_progression(args) {
        Ok(p) => {
            let pattern = RomanPattern::analyze(&p.chords, &p.key);
            CommandResult::Message(format!(
                "{} in {}: {}",
                p.chords.join(" "),
                p.key,
                pattern.to_string().bright_cyan().bold()
            ))
        }
        Err(e) => CommandResult::Error(format!("{}. Usage: pattern <chords...> [in <key>]", e)),
    }
}

/// Handle `songs [pattern]`
pub fn cmd_songs(args: &str, _ctx: &mut CommandContext) -> CommandResult {
    let catalog = SongCatalog::builtin();

    if args.is_empty() {
        let mut out = format!("{} ({})\n", "Known patterns".bold(), catalog.len());
        for pattern in catalog.patterns() {
            let count = catalog.get(pattern).map_or(0, |songs| songs.len());
            out.push_str(&format!("  {:<20} {} songs\n", pattern.cyan(), count));
        }
        return CommandResult::Message(out.trim_end().to_string());
    }

    match catalog.get(args) {
        Some(songs) => CommandResult::Message(format_songs(songs).trim_end().to_string()),
        None => CommandResult::Error(format!("Unknown pattern '{}'", args)),
    }
}

/// Handle `chords`
pub fn cmd_chords(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let names = ctx.player.voicings().chord_names();
    CommandResult::Message(format!(
        "{} ({}): {}",
        "Known chords".bold(),
        names.len(),
        names.join(" ")
    ))
}

/// Handle `voicing <chord>`
pub fn cmd_voicing(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: voicing <chord>".to_string());
    }

    let voicings = ctx.player.voicings();
    if !voicings.contains(args) {
        return CommandResult::Error(format!("No voicing for '{}'", args));
    }

    let mut out = format!("{}\n", args.bright_cyan().bold());
    if let Some(piano) = voicings.piano(args) {
        out.push_str(&format!("  {} {}\n", "piano:".green(), piano.notes.join(" ")));
    }
    for (i, shape) in voicings.guitar(args).iter().enumerate() {
        let label = if i == 0 { "guitar:" } else { "       " };
        out.push_str(&format!("  {} {}\n", label.green(), format_shape(shape)));
    }
    CommandResult::Message(out.trim_end().to_string())
}

fn format_songs(songs: &[SongEntry]) -> String {
    let mut out = format!("{}\n", "Songs with this progression:".green());
    for song in songs {
        out.push_str(&format!("  ♪ {} - {}\n", song.title.bold(), song.artist));
    }
    out
}

/// Frets low E to high E, `x` for muted strings
pub fn format_shape(shape: &GuitarVoicing) -> String {
    let frets: Vec<String> = shape
        .strings
        .iter()
        .map(|&fret| {
            if fret == MUTED {
                "x".to_string()
            } else {
                fret.to_string()
            }
        })
        .collect();

    let mut out = frets.join(" ");
    if shape.start_fret > 1 {
        out.push_str(&format!(" (from fret {})", shape.start_fret));
    }
    if !shape.barres.is_empty() {
        let barres: Vec<String> = shape.barres.iter().map(u8::to_string).collect();
        out.push_str(&format!(" barre {}", barres.join(",")));
    }
    out
}
