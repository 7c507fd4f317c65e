//! Progression playback
//!
//! `ProgressionPlayer` turns a list of chord names into scheduled voices on
//! the shared audio context, plus one wall-clock timeout per chord that
//! reports the chord index to the caller and a final timeout that reports
//! completion. Chord `i` starts at
//!
//! ```text
//! t0 + i * (chord_duration + gap),   t0 = now + lead_in
//! ```
//!
//! and completion fires `completion_tail` seconds after the last slot ends.
//!
//! At most one playback is active per player: starting a new one cancels the
//! previous handle first, which silences its voices and clears its pending
//! timeouts before anything new is scheduled.
//!
//! # Callback guarantees
//!
//! - chord callbacks arrive in index order, at most once each
//! - `on_complete` runs exactly once, whether the playback finishes or is
//!   cancelled
//! - once `cancel` returns, no further chord callback runs for that handle
//!
//! Callbacks run on the timer thread (or inside `cancel` for `on_complete`)
//! and may start or stop playback themselves.

use crate::audio::context::{AudioContext, SharedContext, UnitId};
use crate::audio::output::CpalContext;
use crate::audio::synth::voice_chord;
use crate::audio::timer::{ThreadTimers, TimerId, TimerService};
use anyhow::Result;
use chordmood_core::{Instrument, PlaybackConfig, VoicingLibrary};
use parking_lot::{Mutex, ReentrantMutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing has been scheduled
    Idle,
    /// Scheduled; no chord has been reported yet
    Scheduled,
    /// At least one chord has been reported
    Playing,
    Completed,
    Cancelled,
}

impl PlaybackState {
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Scheduled => "scheduled",
            PlaybackState::Playing => "playing",
            PlaybackState::Completed => "completed",
            PlaybackState::Cancelled => "cancelled",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, PlaybackState::Completed | PlaybackState::Cancelled)
    }
}

type ChordCallback = Box<dyn FnMut(usize) + Send>;
type CompleteCallback = Box<dyn FnOnce() + Send>;
type Slot = Mutex<Option<PlaybackHandle>>;

struct HandleInner {
    id: u64,
    chord_count: usize,
    state: Mutex<PlaybackState>,
    /// Held while a callback is delivered or the playback finishes.
    /// Reentrant so callbacks may cancel their own playback.
    gate: ReentrantMutex<()>,
    units: Mutex<Vec<UnitId>>,
    timers: Mutex<Vec<TimerId>>,
    context: Arc<dyn AudioContext>,
    timer_service: Arc<dyn TimerService>,
    on_chord_change: Mutex<ChordCallback>,
    on_complete: Mutex<Option<CompleteCallback>>,
    slot: Weak<Slot>,
}

/// Shared handle to one scheduled playback
#[derive(Clone)]
pub struct PlaybackHandle {
    inner: Arc<HandleInner>,
}

impl PlaybackHandle {
    fn new(
        id: u64,
        chord_count: usize,
        context: Arc<dyn AudioContext>,
        timer_service: Arc<dyn TimerService>,
        on_chord_change: ChordCallback,
        on_complete: CompleteCallback,
        slot: Weak<Slot>,
    ) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                id,
                chord_count,
                state: Mutex::new(PlaybackState::Scheduled),
                gate: ReentrantMutex::new(()),
                units: Mutex::new(Vec::new()),
                timers: Mutex::new(Vec::new()),
                context,
                timer_service,
                on_chord_change: Mutex::new(on_chord_change),
                on_complete: Mutex::new(Some(on_complete)),
                slot,
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn chord_count(&self) -> usize {
        self.inner.chord_count
    }

    pub fn state(&self) -> PlaybackState {
        *self.inner.state.lock()
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_finished()
    }

    /// Voices still owned by this playback
    pub fn unit_count(&self) -> usize {
        self.inner.units.lock().len()
    }

    /// Stop every voice and pending timeout, then run `on_complete`.
    ///
    /// Safe to call any number of times from any thread; only the first call
    /// on an unfinished playback has an effect. Returns whether this call
    /// did the cancelling.
    pub fn cancel(&self) -> bool {
        self.finish(PlaybackState::Cancelled)
    }

    fn track_unit(&self, unit: UnitId) {
        let _gate = self.inner.gate.lock();
        if self.is_finished() {
            self.inner.context.stop_voice(unit);
        } else {
            self.inner.units.lock().push(unit);
        }
    }

    fn track_timer(&self, timer: TimerId) {
        let _gate = self.inner.gate.lock();
        if self.state() == PlaybackState::Cancelled {
            self.inner.timer_service.clear_timeout(timer);
        } else {
            self.inner.timers.lock().push(timer);
        }
    }

    fn deliver(&self, index: usize) {
        let _gate = self.inner.gate.lock();
        {
            let mut state = self.inner.state.lock();
            match *state {
                PlaybackState::Scheduled | PlaybackState::Playing => {
                    *state = PlaybackState::Playing;
                }
                _ => return,
            }
        }
        log::debug!("playback {}: chord {}", self.inner.id, index);
        let mut on_chord_change = self.inner.on_chord_change.lock();
        (on_chord_change)(index);
    }

    fn finish(&self, outcome: PlaybackState) -> bool {
        let inner = &self.inner;
        let _gate = inner.gate.lock();
        {
            let mut state = inner.state.lock();
            if state.is_finished() {
                return false;
            }
            *state = outcome;
        }

        let timers = std::mem::take(&mut *inner.timers.lock());
        let units = std::mem::take(&mut *inner.units.lock());
        if outcome == PlaybackState::Cancelled {
            for timer in timers {
                inner.timer_service.clear_timeout(timer);
            }
            for unit in &units {
                inner.context.stop_voice(*unit);
            }
            log::info!(
                "playback {} cancelled, {} units stopped",
                inner.id,
                units.len()
            );
        } else {
            log::info!("playback {} completed", inner.id);
        }

        self.detach();

        let on_complete = inner.on_complete.lock().take();
        if let Some(on_complete) = on_complete {
            on_complete();
        }
        true
    }

    /// Leave the player's current slot if we still occupy it
    fn detach(&self) {
        if let Some(slot) = self.inner.slot.upgrade() {
            let mut current = slot.lock();
            if current.as_ref().is_some_and(|h| h.id() == self.id()) {
                *current = None;
            }
        }
    }
}

impl std::fmt::Debug for PlaybackHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackHandle")
            .field("id", &self.inner.id)
            .field("chord_count", &self.inner.chord_count)
            .field("state", &self.state())
            .finish()
    }
}

fn delay_until(at: f64, now: f64) -> Duration {
    Duration::from_secs_f64((at - now).max(0.0))
}

/// Schedules progressions on a shared audio context
pub struct ProgressionPlayer {
    context: SharedContext,
    timers: Arc<dyn TimerService>,
    voicings: Arc<VoicingLibrary>,
    config: PlaybackConfig,
    current: Arc<Slot>,
    next_id: AtomicU64,
}

impl ProgressionPlayer {
    pub fn new(context: SharedContext, timers: Arc<dyn TimerService>) -> Self {
        Self {
            context,
            timers,
            voicings: Arc::new(VoicingLibrary::builtin().clone()),
            config: PlaybackConfig::default(),
            current: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Player on the default sound card; the device opens on first play
    pub fn with_default_output() -> Result<Self> {
        let timers = ThreadTimers::spawn()?;
        Ok(Self::new(
            SharedContext::new(CpalContext::open_shared),
            Arc::new(timers),
        ))
    }

    pub fn with_config(mut self, config: PlaybackConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_voicings(mut self, voicings: Arc<VoicingLibrary>) -> Self {
        self.voicings = voicings;
        self
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Applies to playbacks started afterwards
    pub fn set_config(&mut self, config: PlaybackConfig) {
        self.config = config;
    }

    pub fn voicings(&self) -> &VoicingLibrary {
        &self.voicings
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    /// Schedule `chords` on `instrument`, replacing any current playback.
    ///
    /// `on_chord_change(i)` runs when chord `i` starts sounding; chords with
    /// no known voicing are silent but still reported. `on_complete` runs
    /// once after the last chord, or on cancellation.
    pub fn play_progression<S, F, G>(
        &self,
        chords: &[S],
        instrument: Instrument,
        on_chord_change: F,
        on_complete: G,
    ) -> Result<PlaybackHandle>
    where
        S: AsRef<str>,
        F: FnMut(usize) + Send + 'static,
        G: FnOnce() + Send + 'static,
    {
        self.stop_playback();

        let context = self.context.get()?;
        let config = self.config;
        let now = context.current_time();
        let start = now + config.lead_in;
        let duration = config.chord_duration(instrument);

        let handle = PlaybackHandle::new(
            self.next_id.fetch_add(1, Ordering::Relaxed),
            chords.len(),
            context.clone(),
            self.timers.clone(),
            Box::new(on_chord_change),
            Box::new(on_complete),
            Arc::downgrade(&self.current),
        );

        // A concurrent caller may have slipped in since stop_playback
        let displaced = self.current.lock().replace(handle.clone());
        if let Some(displaced) = displaced {
            displaced.cancel();
        }

        log::info!(
            "playback {}: {} chords on {} from {:.3}s",
            handle.id(),
            chords.len(),
            instrument,
            start
        );

        for (index, chord) in chords.iter().enumerate() {
            let chord = chord.as_ref();
            let at = start + config.chord_offset(instrument, index);

            match self.voicings.notes_for(chord) {
                Some(notes) => {
                    let voices = voice_chord(instrument, notes, at, duration, &config);
                    log::debug!(
                        "chord {} '{}' at {:.3}s: {} units",
                        index,
                        chord,
                        at,
                        voices.len()
                    );
                    for voice in voices {
                        handle.track_unit(context.start_voice(voice));
                    }
                }
                None => log::warn!("no voicing for chord '{}', index {} is silent", chord, index),
            }

            let target = handle.clone();
            let timer = self
                .timers
                .set_timeout(delay_until(at, now), Box::new(move || target.deliver(index)));
            handle.track_timer(timer);
        }

        let end = start + config.schedule_length(instrument, chords.len());
        let completion = delay_until(end, now) + Duration::from_secs_f64(config.completion_tail);
        let target = handle.clone();
        let timer = self.timers.set_timeout(
            completion,
            Box::new(move || {
                target.finish(PlaybackState::Completed);
            }),
        );
        handle.track_timer(timer);

        Ok(handle)
    }

    /// Cancel the current playback, if any
    pub fn stop_playback(&self) {
        // The guard must drop before cancel(); finish() re-locks the slot
        loop {
            let taken = self.current.lock().take();
            let Some(handle) = taken else {
                break;
            };
            handle.cancel();
        }
    }

    /// The active playback, if any
    pub fn current(&self) -> Option<PlaybackHandle> {
        self.current.lock().clone()
    }

    pub fn state(&self) -> PlaybackState {
        self.current()
            .map(|handle| handle.state())
            .unwrap_or(PlaybackState::Idle)
    }

    pub fn is_playing(&self) -> bool {
        self.current().is_some()
    }
}

impl Drop for ProgressionPlayer {
    fn drop(&mut self) {
        self.stop_playback();
    }
}
