//! Deterministic audio context and timers for tests and batch rendering
//!
//! `OfflineContext` advances its clock only when asked to render, and keeps
//! a record of every voice it was handed so schedules can be inspected
//! without a sound card. `ManualTimers` is a `TimerService` whose clock
//! only moves on `advance`.

use crate::audio::context::{AudioContext, ContextState, Mixer, UnitId};
use crate::audio::synth::voice_chord;
use crate::audio::timer::{TimerCallback, TimerId, TimerService};
use crate::audio::voice::Voice;
use anyhow::{Result, anyhow};
use chordmood_core::{Instrument, PlaybackConfig, VoicingLibrary};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// What happened to one voice handed to an `OfflineContext`
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceRecord {
    pub id: UnitId,
    pub start: f64,
    pub stop: f64,
    pub frequencies: Vec<f32>,
    /// Clock time at which `stop_voice` cut the voice short
    pub stopped_at: Option<f64>,
}

pub struct OfflineContext {
    mixer: Mutex<Mixer>,
    state: Mutex<ContextState>,
    history: Mutex<Vec<VoiceRecord>>,
}

impl OfflineContext {
    /// Create a suspended context; `resume` before rendering
    pub fn new(sample_rate: f32) -> Self {
        Self {
            mixer: Mutex::new(Mixer::new(sample_rate)),
            state: Mutex::new(ContextState::Suspended),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Render `frames` mono samples, advancing the clock. A context that is
    /// not running produces nothing and its clock stays put.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        if *self.state.lock() != ContextState::Running {
            return Vec::new();
        }
        let mut buffer = vec![0.0; frames];
        self.mixer.lock().render(&mut buffer);
        buffer
    }

    /// Render enough frames to cover `seconds`
    pub fn render_seconds(&self, seconds: f64) -> Vec<f32> {
        let frames = (seconds * self.sample_rate() as f64).round().max(0.0) as usize;
        self.render(frames)
    }

    pub fn close(&self) {
        *self.state.lock() = ContextState::Closed;
    }

    /// Every voice ever started, in start order
    pub fn history(&self) -> Vec<VoiceRecord> {
        self.history.lock().clone()
    }

    /// Voices that were cut short by `stop_voice`
    pub fn stopped(&self) -> Vec<VoiceRecord> {
        self.history
            .lock()
            .iter()
            .filter(|record| record.stopped_at.is_some())
            .cloned()
            .collect()
    }
}

impl AudioContext for OfflineContext {
    fn current_time(&self) -> f64 {
        self.mixer.lock().time()
    }

    fn sample_rate(&self) -> f32 {
        self.mixer.lock().sample_rate()
    }

    fn state(&self) -> ContextState {
        *self.state.lock()
    }

    fn resume(&self) -> Result<()> {
        let mut state = self.state.lock();
        match *state {
            ContextState::Closed => Err(anyhow!("Cannot resume a closed audio context")),
            _ => {
                *state = ContextState::Running;
                Ok(())
            }
        }
    }

    fn start_voice(&self, voice: Voice) -> UnitId {
        let record = VoiceRecord {
            id: 0,
            start: voice.start_time(),
            stop: voice.stop_time(),
            frequencies: voice.frequencies(),
            stopped_at: None,
        };
        let id = self.mixer.lock().add(voice);
        self.history.lock().push(VoiceRecord { id, ..record });
        id
    }

    fn stop_voice(&self, id: UnitId) {
        let (removed, now) = {
            let mut mixer = self.mixer.lock();
            (mixer.remove(id), mixer.time())
        };
        if removed {
            if let Some(record) = self.history.lock().iter_mut().find(|r| r.id == id) {
                record.stopped_at = Some(now);
            }
        }
    }

    fn active_voices(&self) -> usize {
        self.mixer.lock().len()
    }
}

/// Render a whole progression to mono samples, lead-in and tail included.
/// Chords without a voicing render as silence.
pub fn render_progression<S: AsRef<str>>(
    chords: &[S],
    instrument: Instrument,
    config: &PlaybackConfig,
    voicings: &VoicingLibrary,
    sample_rate: f32,
) -> Vec<f32> {
    let mut mixer = Mixer::new(sample_rate);
    let duration = config.chord_duration(instrument);

    for (index, chord) in chords.iter().enumerate() {
        let Some(notes) = voicings.notes_for(chord.as_ref()) else {
            continue;
        };
        let at = config.lead_in + config.chord_offset(instrument, index);
        for voice in voice_chord(instrument, notes, at, duration, config) {
            mixer.add(voice);
        }
    }

    let length =
        config.lead_in + config.schedule_length(instrument, chords.len()) + config.completion_tail;
    let mut buffer = vec![0.0; (length * sample_rate as f64).round() as usize];
    mixer.render(&mut buffer);
    buffer
}

struct ManualTimer {
    deadline: Duration,
    id: TimerId,
    callback: TimerCallback,
}

/// Timers driven by an explicit clock
///
/// Due callbacks run on the thread calling `advance`, in deadline order,
/// with no lock held, so a callback may set or clear other timeouts.
#[derive(Default)]
pub struct ManualTimers {
    now: Mutex<Duration>,
    next_id: AtomicU64,
    pending: Mutex<Vec<ManualTimer>>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since creation
    pub fn now(&self) -> Duration {
        *self.now.lock()
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Move the clock forward by `by`, firing everything that comes due
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        while let Some(timer) = self.pop_due(target) {
            *self.now.lock() = timer.deadline;
            (timer.callback)();
        }
        *self.now.lock() = target;
    }

    pub fn advance_secs(&self, seconds: f64) {
        self.advance(Duration::from_secs_f64(seconds.max(0.0)));
    }

    /// Fire everything still pending, however far away
    pub fn run_all(&self) {
        while let Some(timer) = self.pop_due(Duration::MAX) {
            *self.now.lock() = timer.deadline;
            (timer.callback)();
        }
    }

    fn pop_due(&self, limit: Duration) -> Option<ManualTimer> {
        let mut pending = self.pending.lock();
        let index = pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.deadline <= limit)
            .min_by_key(|(_, timer)| (timer.deadline, timer.id))
            .map(|(index, _)| index)?;
        Some(pending.remove(index))
    }
}

impl TimerService for ManualTimers {
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let deadline = self.now().saturating_add(delay);
        self.pending.lock().push(ManualTimer {
            deadline,
            id,
            callback,
        });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.pending.lock().retain(|timer| timer.id != id);
    }
}
