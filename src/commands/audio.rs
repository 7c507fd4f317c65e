//! Playback commands (play, stop, instrument, config)

use crate::commands::{CommandContext, CommandResult, PlaybackEvent, parse_progression};
use chordmood_core::{Instrument, PlaybackConfig};
use colored::*;

/// Handle `play [<chords...>] [on <instrument>]`
///
/// With no chords, replays the last analyzed or played progression.
pub fn cmd_play(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let (chord_text, instrument) = match args.rsplit_once(" on ") {
        Some((chords, name)) => match Instrument::from_str(name) {
            Some(instrument) => (chords, instrument),
            None => return CommandResult::Error(format!("Unknown instrument '{}'", name.trim())),
        },
        None => match args.strip_prefix("on ") {
            Some(name) => match Instrument::from_str(name) {
                Some(instrument) => ("", instrument),
                None => {
                    return CommandResult::Error(format!("Unknown instrument '{}'", name.trim()));
                }
            },
            None => (args, ctx.instrument),
        },
    };

    let chords = if chord_text.trim().is_empty() {
        match &ctx.last_progression {
            Some(chords) => chords.clone(),
            None => {
                return CommandResult::Error(
                    "Usage: play <chords...> [on guitar|piano]".to_string(),
                );
            }
        }
    } else {
        match parse_progression(chord_text) {
            Ok(p) => p.chords,
            Err(e) => return CommandResult::Error(e),
        }
    };

    let tag = ctx.next_tag();
    let total = chords.len();
    let names = chords.clone();
    let chord_events = ctx.events.clone();
    let done_events = ctx.events.clone();

    let result = ctx.player.play_progression(
        &chords,
        instrument,
        move |index| {
            let chord = names.get(index).cloned().unwrap_or_default();
            let _ = chord_events.send(PlaybackEvent::Chord {
                tag,
                index,
                chord,
                total,
            });
        },
        move || {
            let _ = done_events.send(PlaybackEvent::Finished { tag });
        },
    );

    match result {
        Ok(_) => {
            ctx.last_progression = Some(chords.clone());
            CommandResult::Message(
                format!(
                    "🎵 Playing {} on {} ({} chords)",
                    chords.join(" "),
                    instrument,
                    total
                )
                .bright_green()
                .to_string(),
            )
        }
        Err(e) => CommandResult::Error(format!("Failed to start playback: {}", e)),
    }
}

/// Handle `stop`
pub fn cmd_stop(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    if !ctx.player.is_playing() {
        return CommandResult::Message("Nothing is playing".to_string());
    }
    // Silence the cancelled playback's completion report
    ctx.next_tag();
    ctx.player.stop_playback();
    CommandResult::Message("🔇 Playback stopped.".bright_green().to_string())
}

/// Handle `instrument [guitar|piano]`
pub fn cmd_instrument(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Current instrument: {}", ctx.instrument));
    }

    match Instrument::from_str(args) {
        Some(instrument) => {
            ctx.instrument = instrument;
            CommandResult::Message(
                format!("🎸 Instrument set to {}", instrument)
                    .bright_green()
                    .to_string(),
            )
        }
        None => CommandResult::Error("Unknown instrument. Use 'guitar' or 'piano'".to_string()),
    }
}

/// Handle `config`
pub fn cmd_config(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if !args.is_empty() {
        return CommandResult::Error("Usage: config | config load <file.json>".to_string());
    }
    match serde_json::to_string_pretty(ctx.player.config()) {
        Ok(json) => CommandResult::Message(json),
        Err(e) => CommandResult::Error(format!("Failed to format config: {}", e)),
    }
}

/// Handle `config load <file.json>`; missing fields keep their defaults
pub fn cmd_config_load(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: config load <file.json>".to_string());
    }

    let contents = match std::fs::read_to_string(args) {
        Ok(contents) => contents,
        Err(e) => return CommandResult::Error(format!("Failed to read {}: {}", args, e)),
    };

    match parse_config(&contents) {
        Ok(config) => {
            ctx.player.set_config(config);
            log::info!("playback config loaded from {}", args);
            CommandResult::Message(format!("✓ Loaded config from {}", args).bright_green().to_string())
        }
        Err(e) => CommandResult::Error(format!("Invalid config in {}: {}", args, e)),
    }
}

/// Parse a JSON playback config, clamping values the way the builders do
pub fn parse_config(json: &str) -> anyhow::Result<PlaybackConfig> {
    let raw: PlaybackConfig = serde_json::from_str(json)?;
    Ok(PlaybackConfig::new()
        .with_lead_in(raw.lead_in)
        .with_gap(raw.gap)
        .with_completion_tail(raw.completion_tail)
        .with_chord_duration(Instrument::Guitar, raw.guitar_chord_duration)
        .with_chord_duration(Instrument::Piano, raw.piano_chord_duration)
        .with_strum_spread(raw.strum_spread)
        .with_master_level(raw.master_level))
}
