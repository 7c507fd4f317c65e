//! REPL (Read-Eval-Print Loop) for browsing progressions by mood

use crate::audio::player::ProgressionPlayer;
use crate::commands::{
    CommandContext, CommandRegistry, CommandResult, PlaybackEvent, create_registry,
    looks_like_progression,
};
use anyhow::{Result, anyhow};
use colored::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::thread;

/// Types of events the REPL loop handles
enum ReplEvent {
    Input(Result<String, ReadlineError>),
}

/// Interactive chord progression browser
pub struct Repl {
    editor: Option<DefaultEditor>,
    registry: CommandRegistry,
    context: CommandContext,

    // Event channels
    tx_input: Sender<ReplEvent>,
    rx_input: Receiver<ReplEvent>,
    rx_playback: Receiver<PlaybackEvent>,
}

impl Repl {
    /// Create a REPL playing through the default output device.
    /// The device is opened on the first `play`.
    pub fn new() -> Result<Self> {
        let editor =
            DefaultEditor::new().map_err(|e| anyhow!("Failed to create line editor: {}", e))?;
        let player = ProgressionPlayer::with_default_output()?;
        Ok(Self::with_player(Some(editor), player))
    }

    fn with_player(editor: Option<DefaultEditor>, player: ProgressionPlayer) -> Self {
        let (tx_input, rx_input) = unbounded();
        let (tx_playback, rx_playback) = unbounded();

        Repl {
            editor,
            registry: create_registry(),
            context: CommandContext::new(player, tx_playback),
            tx_input,
            rx_input,
            rx_playback,
        }
    }

    /// Run one line of input; returns false when the REPL should exit
    pub fn handle_line(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return true;
        }

        let mut result = self.registry.execute(line, &mut self.context);
        if result == CommandResult::NotACommand && looks_like_progression(line) {
            result = self.registry.execute(&format!("analyze {}", line), &mut self.context);
        }

        match result {
            CommandResult::Success => {}
            CommandResult::Message(msg) => println!("{}", msg),
            CommandResult::Exit => {
                println!("{} 🎵", "Goodbye!".bright_cyan());
                return false;
            }
            CommandResult::Error(e) => {
                println!("{} {}", "Error:".bright_red().bold(), e.red());
            }
            CommandResult::NotACommand => {
                println!(
                    "{} Unknown command '{}'. Type '{}' for a list.",
                    "Error:".bright_red().bold(),
                    line,
                    "help".bright_green()
                );
            }
        }
        true
    }

    /// Format a playback report, or None when it belongs to an old playback
    pub fn describe_event(&self, event: &PlaybackEvent) -> Option<String> {
        match event {
            PlaybackEvent::Chord {
                tag,
                index,
                chord,
                total,
            } if *tag == self.context.active_tag => Some(format!(
                "{} {} {}",
                "▶".bright_green(),
                chord.bright_cyan().bold(),
                format!("({}/{})", index + 1, total).dimmed()
            )),
            PlaybackEvent::Finished { tag } if *tag == self.context.active_tag => {
                Some(format!("{}", "✓ Playback finished".dimmed()))
            }
            _ => None,
        }
    }

    /// Start the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "🎵".bright_yellow(),
            "Chordmood Progression Browser".bright_cyan().bold()
        );
        println!(
            "Type a progression like {} or {}",
            "C G Am F".cyan(),
            "play Am F C G on guitar".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        let mut editor = self
            .editor
            .take()
            .ok_or_else(|| anyhow!("REPL is already running"))?;
        let tx_input = self.tx_input.clone();

        thread::Builder::new()
            .name("chordmood-readline".into())
            .spawn(move || {
                loop {
                    let prompt = format!("{} ", "chordmood>".bright_magenta().bold());
                    match editor.readline(&prompt) {
                        Ok(line) => {
                            let line = line.trim().to_string();
                            if !line.is_empty() {
                                let _ = editor.add_history_entry(&line);
                            }
                            if tx_input.send(ReplEvent::Input(Ok(line))).is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            let _ = tx_input.send(ReplEvent::Input(Err(err)));
                            break;
                        }
                    }
                }
            })?;

        loop {
            crossbeam_channel::select! {
                recv(self.rx_input) -> msg => match msg {
                    Ok(ReplEvent::Input(Ok(line))) => {
                        if !self.handle_line(&line) {
                            break;
                        }
                    }
                    Ok(ReplEvent::Input(Err(ReadlineError::Interrupted)))
                    | Ok(ReplEvent::Input(Err(ReadlineError::Eof))) => {
                        println!("{} 🎵", "Goodbye!".bright_cyan());
                        break;
                    }
                    Ok(ReplEvent::Input(Err(err))) => {
                        println!(
                            "{} {}",
                            "Error reading input:".bright_red().bold(),
                            err.to_string().red()
                        );
                        break;
                    }
                    Err(_) => break, // Channel closed
                },

                recv(self.rx_playback) -> msg => {
                    if let Ok(event) = msg {
                        if let Some(line) = self.describe_event(&event) {
                            println!("{}", line);
                        }
                    }
                }
            }
        }

        self.context.player.stop_playback();
        Ok(())
    }
}

/// Convenience function to start the REPL
pub fn start() -> Result<()> {
    let mut repl = Repl::new().map_err(|e| anyhow!("Failed to initialize REPL: {}", e))?;
    repl.run()
}
