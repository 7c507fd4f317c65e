//! Audio context abstraction
//!
//! An `AudioContext` owns an audio clock and accepts scheduled `Voice`s.
//! The real device backend lives in `output`; `offline` renders into
//! buffers for tests. Both share the `Mixer` that sums active voices and
//! drives the clock one frame at a time.
//!
//! `SharedContext` creates the context lazily on first use, resumes it when
//! suspended, and hands the same instance to every later caller.

use crate::audio::voice::Voice;
use anyhow::{Result, anyhow};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Identifier of a voice started on a context
pub type UnitId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Clock is frozen; created contexts start here
    Suspended,
    Running,
    Closed,
}

impl ContextState {
    pub fn name(&self) -> &'static str {
        match self {
            ContextState::Suspended => "suspended",
            ContextState::Running => "running",
            ContextState::Closed => "closed",
        }
    }
}

/// A clock plus a sink for scheduled voices
pub trait AudioContext: Send + Sync {
    /// Seconds elapsed on the audio clock
    fn current_time(&self) -> f64;

    fn sample_rate(&self) -> f32;

    fn state(&self) -> ContextState;

    /// Start (or restart) the clock
    fn resume(&self) -> Result<()>;

    /// Hand a voice to the renderer; it sounds once the clock reaches its start
    fn start_voice(&self, voice: Voice) -> UnitId;

    /// Silence a voice immediately. Unknown or finished ids are ignored.
    fn stop_voice(&self, id: UnitId);

    /// Number of voices not yet finished
    fn active_voices(&self) -> usize;
}

/// Sums active voices and advances the frame clock
pub struct Mixer {
    voices: BTreeMap<UnitId, Voice>,
    next_id: UnitId,
    sample_rate: f32,
    frame: u64,
}

impl Mixer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: BTreeMap::new(),
            next_id: 1,
            sample_rate,
            frame: 0,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Current clock position in seconds
    pub fn time(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn add(&mut self, voice: Voice) -> UnitId {
        let id = self.next_id;
        self.next_id += 1;
        self.voices.insert(id, voice);
        id
    }

    /// Returns true when the voice was still scheduled
    pub fn remove(&mut self, id: UnitId) -> bool {
        self.voices.remove(&id).is_some()
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.voices.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Render one mono frame and advance the clock
    pub fn render_frame(&mut self) -> f32 {
        let time = self.time();
        let sample_rate = self.sample_rate;

        let mut sum = 0.0f32;
        for voice in self.voices.values_mut() {
            sum += voice.render(time, sample_rate);
        }
        self.voices.retain(|_, voice| !voice.is_finished(time));
        self.frame += 1;

        sum.clamp(-1.0, 1.0)
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.render_frame();
        }
    }
}

/// Builds a fresh context on demand
pub type ContextFactory = Box<dyn Fn() -> Result<Arc<dyn AudioContext>> + Send + Sync>;

/// Lazily created, process-wide audio context
pub struct SharedContext {
    factory: ContextFactory,
    context: Mutex<Option<Arc<dyn AudioContext>>>,
}

impl SharedContext {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn AudioContext>> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            context: Mutex::new(None),
        }
    }

    /// Wrap an already created context
    pub fn from_context(context: Arc<dyn AudioContext>) -> Self {
        let shared = context.clone();
        Self {
            factory: Box::new(move || Ok(shared.clone())),
            context: Mutex::new(Some(context)),
        }
    }

    /// The running context, creating or resuming it as needed
    pub fn get(&self) -> Result<Arc<dyn AudioContext>> {
        let mut slot = self.context.lock();

        let context = match slot.as_ref() {
            Some(context) if context.state() != ContextState::Closed => context.clone(),
            _ => {
                let context = (self.factory)()?;
                log::info!(
                    "audio context opened at {} Hz",
                    context.sample_rate()
                );
                *slot = Some(context.clone());
                context
            }
        };

        match context.state() {
            ContextState::Running => {}
            ContextState::Suspended => {
                context.resume()?;
                log::debug!("audio context resumed");
            }
            ContextState::Closed => return Err(anyhow!("Audio context closed while opening")),
        }

        Ok(context)
    }

    pub fn is_initialized(&self) -> bool {
        self.context.lock().is_some()
    }

    /// State of the current context, if one was created
    pub fn state(&self) -> Option<ContextState> {
        self.context.lock().as_ref().map(|context| context.state())
    }

    /// Drop the current context; the next `get` builds a new one
    pub fn close(&self) {
        if self.context.lock().take().is_some() {
            log::info!("audio context released");
        }
    }
}
