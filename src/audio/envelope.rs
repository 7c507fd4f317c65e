//! Parameter automation curves
//!
//! Sample-accurate automation in the style of a Web Audio `AudioParam`: a
//! value is pinned at a time, then ramped linearly or exponentially towards
//! later targets. Times are absolute seconds on the audio clock.
//!
//! # Example
//! ```ignore
//! let mut gain = Automation::new(0.0);
//! gain.set_value_at_time(0.0, start)
//!     .linear_ramp_to_value_at_time(0.05, start + 0.008)
//!     .exponential_ramp_to_value_at_time(0.0005, start + 0.8);
//!
//! // In the render loop:
//! let amplitude = gain.value_at(time);
//! ```

/// Smallest magnitude an exponential ramp may target
pub const MIN_EXPONENTIAL_VALUE: f32 = 0.0001;

/// How the segment ending at an automation event is shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampKind {
    /// Jump to the value at the event time
    Set,
    /// Straight line from the previous event
    Linear,
    /// Constant ratio per unit time from the previous event
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AutomationEvent {
    time: f64,
    value: f32,
    kind: RampKind,
}

/// A time-ordered list of automation events with a resting value
#[derive(Debug, Clone, PartialEq)]
pub struct Automation {
    default_value: f32,
    events: Vec<AutomationEvent>,
}

impl Automation {
    /// Create an automation that holds `default_value` until its first event
    pub fn new(default_value: f32) -> Self {
        Self {
            default_value,
            events: Vec::new(),
        }
    }

    /// Pin the value at `time`
    pub fn set_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(AutomationEvent {
            time,
            value,
            kind: RampKind::Set,
        })
    }

    /// Ramp linearly from the previous event to `value`, arriving at `time`
    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(AutomationEvent {
            time,
            value,
            kind: RampKind::Linear,
        })
    }

    /// Ramp exponentially from the previous event to `value`, arriving at `time`
    ///
    /// Exponential curves cannot cross or touch zero; a segment whose ends
    /// differ in sign or include zero holds the previous value instead.
    pub fn exponential_ramp_to_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(AutomationEvent {
            time,
            value,
            kind: RampKind::Exponential,
        })
    }

    fn insert(&mut self, event: AutomationEvent) -> &mut Self {
        // Events at the same time keep insertion order
        let index = self.events.partition_point(|e| e.time <= event.time);
        self.events.insert(index, event);
        self
    }

    /// Value of the parameter at `time`
    pub fn value_at(&self, time: f64) -> f32 {
        let next_index = self.events.partition_point(|e| e.time <= time);

        let Some(previous) = next_index.checked_sub(1).map(|i| self.events[i]) else {
            return self.default_value;
        };

        let Some(next) = self.events.get(next_index) else {
            return previous.value;
        };

        let span = next.time - previous.time;
        if span <= 0.0 {
            return previous.value;
        }
        let progress = ((time - previous.time) / span) as f32;

        match next.kind {
            RampKind::Set => previous.value,
            RampKind::Linear => previous.value + (next.value - previous.value) * progress,
            RampKind::Exponential => {
                let (from, to) = (previous.value, next.value);
                if from == 0.0 || to == 0.0 || from.signum() != to.signum() {
                    from
                } else {
                    from * (to / from).powf(progress)
                }
            }
        }
    }

    /// Time of the last event, or 0 when there are none
    pub fn end_time(&self) -> f64 {
        self.events.last().map(|e| e.time).unwrap_or(0.0)
    }

    /// Value held after the last event
    pub fn final_value(&self) -> f32 {
        self.events
            .last()
            .map(|e| e.value)
            .unwrap_or(self.default_value)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for Automation {
    fn default() -> Self {
        Self::new(0.0)
    }
}
