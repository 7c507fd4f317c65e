//! Command registry for REPL commands
//!
//! Provides a clean, extensible pattern for handling REPL commands.

pub mod analysis;
pub mod audio;
pub mod general;

use crate::audio::player::ProgressionPlayer;
use chordmood_core::{ChordSymbol, Instrument};
use crossbeam_channel::Sender;

/// Result of executing a command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// Not a command
    NotACommand,
    /// Error occurred
    Error(String),
}

/// Progress reports sent from playback callbacks to the REPL loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Chord {
        tag: u64,
        index: usize,
        chord: String,
        total: usize,
    },
    Finished {
        tag: u64,
    },
}

/// Context passed to command handlers
pub struct CommandContext {
    pub player: ProgressionPlayer,
    /// Instrument used by `play`
    pub instrument: Instrument,
    /// Last progression analyzed or played, replayed by a bare `play`
    pub last_progression: Option<Vec<String>>,
    pub events: Sender<PlaybackEvent>,
    /// Tag of the playback whose events are still worth showing
    pub active_tag: u64,
}

impl CommandContext {
    pub fn new(player: ProgressionPlayer, events: Sender<PlaybackEvent>) -> Self {
        Self {
            player,
            instrument: Instrument::default(),
            last_progression: None,
            events,
            active_tag: 0,
        }
    }

    /// Start a new tag; events carrying older tags are ignored
    pub fn next_tag(&mut self) -> u64 {
        self.active_tag += 1;
        self.active_tag
    }
}

/// A chord list with the key it is heard in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionArgs {
    pub chords: Vec<String>,
    pub key: String,
}

/// Parse `<chords...> [in <key>]`. Chords are separated by whitespace,
/// commas or `-`. Without `in`, the first chord names the key.
pub fn parse_progression(args: &str) -> Result<ProgressionArgs, String> {
    let (chord_text, key) = match args.rsplit_once(" in ") {
        Some((chords, key)) => (chords, Some(key.trim())),
        None => (args, None),
    };

    let chords: Vec<String> = chord_text
        .split(|c: char| c.is_whitespace() || c == ',' || c == '-')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();

    if chords.is_empty() {
        return Err("No chords given".to_string());
    }

    let key = match key {
        Some("") => return Err("Missing key after 'in'".to_string()),
        Some(key) => key.to_string(),
        None => chords[0].clone(),
    };

    Ok(ProgressionArgs { chords, key })
}

/// True when every token reads as a chord symbol with a known root
pub fn looks_like_progression(input: &str) -> bool {
    match parse_progression(input) {
        Ok(args) => args
            .chords
            .iter()
            .chain(std::iter::once(&args.key))
            .all(|chord| ChordSymbol::parse(chord).has_known_root()),
        Err(_) => false,
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Commands indexed by their prefix
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        // Sort by prefix length descending for longest-match-first
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = if input.len() > prefix.len() {
                    input[prefix.len()..].trim()
                } else {
                    ""
                };
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Analysis commands
    registry.register("analyze", analysis::cmd_analyze);
    registry.register("pattern", analysis::cmd_pattern);
    registry.register("songs", analysis::cmd_songs);
    registry.register("chords", analysis::cmd_chords);
    registry.register("voicing", analysis::cmd_voicing);

    // Playback commands
    registry.register("play", audio::cmd_play);
    registry.register("stop", audio::cmd_stop);
    registry.register("instrument", audio::cmd_instrument);
    registry.register("config load", audio::cmd_config_load);
    registry.register("config", audio::cmd_config);

    // General commands
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progression_with_key() {
        let args = parse_progression("Am F C G in Am").unwrap();
        assert_eq!(args.chords, vec!["Am", "F", "C", "G"]);
        assert_eq!(args.key, "Am");
    }

    #[test]
    fn test_parse_progression_separators_and_default_key() {
        let args = parse_progression("G, D - Em,C").unwrap();
        assert_eq!(args.chords, vec!["G", "D", "Em", "C"]);
        assert_eq!(args.key, "G");
    }

    #[test]
    fn test_parse_progression_errors() {
        assert!(parse_progression("").is_err());
        assert!(parse_progression("   ").is_err());
        assert!(parse_progression("C G in ").is_err());
    }

    #[test]
    fn test_looks_like_progression() {
        assert!(looks_like_progression("C G Am F"));
        assert!(looks_like_progression("Dm7 G7 Cmaj7 in C"));
        assert!(!looks_like_progression("hello world"));
        assert!(!looks_like_progression(""));
    }

    #[test]
    fn test_registry_longest_prefix_wins() {
        let registry = create_registry();
        let commands = registry.list_commands();
        let load = commands.iter().position(|c| *c == "config load").unwrap();
        let config = commands.iter().position(|c| *c == "config").unwrap();
        assert!(load < config);
    }

    #[test]
    fn test_registry_dispatch() {
        let registry = create_registry();
        let mut test = test_support::context();
        assert_eq!(registry.execute("quit", &mut test.ctx), CommandResult::Exit);
        assert_eq!(
            registry.execute("quitter", &mut test.ctx),
            CommandResult::NotACommand
        );
        assert_eq!(
            registry.execute("C G Am F", &mut test.ctx),
            CommandResult::NotACommand
        );
    }
}
