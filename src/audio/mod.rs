//! Audio engine
//!
//! Voices are built from oscillators, automation curves and a low-pass
//! filter, mixed against an audio clock owned by an `AudioContext`, and
//! scheduled by the `ProgressionPlayer`.

pub mod context;
pub mod envelope;
pub mod filter;
pub mod offline;
pub mod oscillator;
pub mod output;
pub mod player;
pub mod synth;
pub mod timer;
pub mod voice;

pub use context::{AudioContext, ContextState, SharedContext, UnitId};
pub use offline::{ManualTimers, OfflineContext, render_progression};
pub use output::CpalContext;
pub use player::{PlaybackHandle, PlaybackState, ProgressionPlayer};
pub use timer::{ThreadTimers, TimerService};
