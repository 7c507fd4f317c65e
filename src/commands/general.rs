//! General REPL commands (help, quit)

use crate::commands::{CommandContext, CommandResult};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Message(help_text())
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

fn help_text() -> String {
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(format!("{}", "🎵 Chordmood Help".bold()));
    line(format!("{}", "=================".bold()));
    line(String::new());
    line(format!("{}", "Analysis:".green()));
    line(format!(
        "  {}   - Roman pattern and songs that share it",
        "analyze C G Am F".cyan()
    ));
    line(format!(
        "  {} - Roman pattern only, key given with 'in'",
        "pattern Am F C G in Am".cyan()
    ));
    line(format!(
        "  {}              - List known patterns, or {} for its songs",
        "songs".cyan(),
        "songs I-V-vi-IV".cyan()
    ));
    line(format!("  {}             - Chords with voicings", "chords".cyan()));
    line(format!(
        "  {}          - Piano notes and guitar shapes",
        "voicing Am".cyan()
    ));
    line(String::new());
    line(format!("{}", "Playback:".green()));
    line(format!(
        "  {}      - Play a progression, {} for the guitar",
        "play C G Am F".cyan(),
        "... on guitar".cyan()
    ));
    line(format!(
        "  {}               - Replay the last progression",
        "play".cyan()
    ));
    line(format!("  {}               - Stop playback", "stop".cyan()));
    line(format!(
        "  {}  - Show or set the instrument",
        "instrument [guitar|piano]".cyan()
    ));
    line(format!(
        "  {}             - Show timing settings, {} to load JSON",
        "config".cyan(),
        "config load <file>".cyan()
    ));
    line(String::new());
    line(format!(
        "A bare progression such as {} is analyzed.",
        "Dm G C".cyan()
    ));
    line(format!(
        "Type '{}' or '{}' to leave.",
        "quit".bright_red(),
        "exit".bright_red()
    ));
    out.trim_end().to_string()
}
