//! Wall-clock timers
//!
//! `TimerService` is the one-shot timeout primitive the player uses to
//! deliver chord-change and completion callbacks. `ThreadTimers` runs a
//! dedicated thread that sleeps until the earliest deadline or the next
//! command, whichever comes first. Callbacks run on that thread, one at a
//! time, in deadline order.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::cmp::Ordering as CmpOrdering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub type TimerId = u64;

pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// One-shot timeouts
pub trait TimerService: Send + Sync {
    /// Run `callback` once `delay` has elapsed
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel a pending timeout. Fired or unknown ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}

enum TimerCommand {
    Schedule {
        id: TimerId,
        deadline: Instant,
        callback: TimerCallback,
    },
    Clear(TimerId),
    Shutdown,
}

/// Timer thread fed by a command channel
pub struct ThreadTimers {
    command_tx: Sender<TimerCommand>,
    next_id: AtomicU64,
    thread: Option<JoinHandle<()>>,
}

impl ThreadTimers {
    pub fn spawn() -> anyhow::Result<Self> {
        let (command_tx, command_rx) = crossbeam_channel::unbounded();

        let thread = thread::Builder::new()
            .name("chordmood-timers".into())
            .spawn(move || TimerThread::new(command_rx).run())?;

        Ok(ThreadTimers {
            command_tx,
            next_id: AtomicU64::new(1),
            thread: Some(thread),
        })
    }
}

impl TimerService for ThreadTimers {
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let deadline = Instant::now() + delay;
        if self
            .command_tx
            .send(TimerCommand::Schedule {
                id,
                deadline,
                callback,
            })
            .is_err()
        {
            log::warn!("timer thread is gone; timeout {} dropped", id);
        }
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        let _ = self.command_tx.send(TimerCommand::Clear(id));
    }
}

impl Drop for ThreadTimers {
    fn drop(&mut self) {
        let _ = self.command_tx.send(TimerCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            // A callback may hold the last reference to us
            if thread.thread().id() != thread::current().id() {
                let _ = thread.join();
            }
        }
    }
}

/// Heap entry; reversed so the earliest deadline is on top
#[derive(Debug, PartialEq, Eq)]
struct Pending {
    deadline: Instant,
    id: TimerId,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

struct TimerThread {
    command_rx: Receiver<TimerCommand>,
    queue: BinaryHeap<Pending>,
    callbacks: HashMap<TimerId, TimerCallback>,
}

impl TimerThread {
    fn new(command_rx: Receiver<TimerCommand>) -> Self {
        Self {
            command_rx,
            queue: BinaryHeap::new(),
            callbacks: HashMap::new(),
        }
    }

    fn run(&mut self) {
        loop {
            self.fire_due();

            let command = match self.queue.peek() {
                Some(next) => {
                    let wait = next.deadline.saturating_duration_since(Instant::now());
                    match self.command_rx.recv_timeout(wait) {
                        Ok(command) => command,
                        Err(RecvTimeoutError::Timeout) => continue,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match self.command_rx.recv() {
                    Ok(command) => command,
                    Err(_) => break,
                },
            };

            if self.handle_command(command) {
                break;
            }
        }
    }

    /// Returns true on shutdown
    fn handle_command(&mut self, command: TimerCommand) -> bool {
        match command {
            TimerCommand::Schedule {
                id,
                deadline,
                callback,
            } => {
                self.queue.push(Pending { deadline, id });
                self.callbacks.insert(id, callback);
            }
            TimerCommand::Clear(id) => {
                // The heap entry stays; it finds no callback when it comes due
                self.callbacks.remove(&id);
            }
            TimerCommand::Shutdown => return true,
        }
        false
    }

    fn fire_due(&mut self) {
        let now = Instant::now();
        while let Some(next) = self.queue.peek() {
            if next.deadline > now {
                break;
            }
            let id = next.id;
            self.queue.pop();
            if let Some(callback) = self.callbacks.remove(&id) {
                callback();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_pending_orders_earliest_first() {
        let base = Instant::now();
        let mut heap = BinaryHeap::new();
        heap.push(Pending {
            deadline: base + Duration::from_millis(30),
            id: 1,
        });
        heap.push(Pending {
            deadline: base + Duration::from_millis(10),
            id: 2,
        });
        heap.push(Pending {
            deadline: base + Duration::from_millis(10),
            id: 3,
        });
        assert_eq!(heap.pop().map(|p| p.id), Some(2));
        assert_eq!(heap.pop().map(|p| p.id), Some(3));
        assert_eq!(heap.pop().map(|p| p.id), Some(1));
    }

    #[test]
    fn test_timeouts_fire_in_deadline_order() {
        let timers = ThreadTimers::spawn().unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();

        for (label, delay) in [("late", 40), ("early", 5), ("middle", 20)] {
            let tx = tx.clone();
            timers.set_timeout(
                Duration::from_millis(delay),
                Box::new(move || {
                    let _ = tx.send(label);
                }),
            );
        }

        let fired: Vec<&str> = (0..3)
            .map(|_| rx.recv_timeout(Duration::from_secs(2)).unwrap())
            .collect();
        assert_eq!(fired, vec!["early", "middle", "late"]);
    }

    #[test]
    fn test_cleared_timeout_never_fires() {
        let timers = ThreadTimers::spawn().unwrap();
        let fired = Arc::new(Mutex::new(Vec::new()));

        let log = fired.clone();
        let cleared = timers.set_timeout(
            Duration::from_millis(20),
            Box::new(move || log.lock().unwrap().push("cleared")),
        );
        let log = fired.clone();
        timers.set_timeout(
            Duration::from_millis(40),
            Box::new(move || log.lock().unwrap().push("kept")),
        );
        timers.clear_timeout(cleared);
        timers.clear_timeout(12345);

        thread::sleep(Duration::from_millis(150));
        assert_eq!(*fired.lock().unwrap(), vec!["kept"]);
    }

    #[test]
    fn test_ids_are_unique() {
        let timers = ThreadTimers::spawn().unwrap();
        let a = timers.set_timeout(Duration::from_secs(60), Box::new(|| {}));
        let b = timers.set_timeout(Duration::from_secs(60), Box::new(|| {}));
        assert_ne!(a, b);
    }
}
