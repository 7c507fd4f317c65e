//! Playback driven by the real timer thread
//!
//! Each scenario runs on a worker thread and the test waits for it with a
//! timeout, so a lock-up fails the test instead of hanging the suite.

use chordmood::audio::{OfflineContext, SharedContext, ThreadTimers};
use chordmood::{Instrument, PlaybackConfig, PlaybackState, ProgressionPlayer};
use crossbeam_channel::{Receiver, RecvTimeoutError, unbounded};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

const SCENARIO_LIMIT: Duration = Duration::from_secs(10);
const EVENT_LIMIT: Duration = Duration::from_secs(3);

/// Chords 0.1s apart, no lead-in or tail
fn quick_config() -> PlaybackConfig {
    PlaybackConfig::new()
        .with_lead_in(0.0)
        .with_gap(0.05)
        .with_completion_tail(0.0)
        .with_chord_duration(Instrument::Piano, 0.05)
        .with_chord_duration(Instrument::Guitar, 0.05)
}

fn threaded_player() -> ProgressionPlayer {
    let context = Arc::new(OfflineContext::new(1000.0));
    let timers = ThreadTimers::spawn().unwrap();
    ProgressionPlayer::new(SharedContext::from_context(context), Arc::new(timers))
        .with_config(quick_config())
}

fn run_guarded<F>(scenario: F)
where
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        scenario();
        let _ = tx.send(());
    });
    match rx.recv_timeout(SCENARIO_LIMIT) {
        Ok(()) => {}
        Err(RecvTimeoutError::Timeout) => panic!("playback scenario did not finish"),
        Err(RecvTimeoutError::Disconnected) => panic!("playback scenario panicked"),
    }
}

struct Listener {
    chords: Receiver<usize>,
    completions: Arc<AtomicUsize>,
    finished: Receiver<()>,
}

fn callbacks() -> (
    impl FnMut(usize) + Send + 'static,
    impl FnOnce() + Send + 'static,
    Listener,
) {
    let (chord_tx, chords) = unbounded::<usize>();
    let (finished_tx, finished) = unbounded();
    let completions = Arc::new(AtomicUsize::new(0));
    let count = completions.clone();
    (
        move |index| {
            let _ = chord_tx.send(index);
        },
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            let _ = finished_tx.send(());
        },
        Listener {
            chords,
            completions,
            finished,
        },
    )
}

#[test]
fn test_runs_to_completion_on_timer_thread() {
    run_guarded(|| {
        let player = threaded_player();
        let (on_chord, on_complete, listener) = callbacks();
        player
            .play_progression(&["C", "G", "Am", "F"], Instrument::Piano, on_chord, on_complete)
            .unwrap();

        assert_eq!(listener.finished.recv_timeout(EVENT_LIMIT), Ok(()));
        let seen: Vec<usize> = listener.chords.try_iter().collect();
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(listener.completions.load(Ordering::SeqCst), 1);
        assert_eq!(player.state(), PlaybackState::Idle);
    });
}

#[test]
fn test_stop_mid_sequence() {
    run_guarded(|| {
        let player = threaded_player();
        let (on_chord, on_complete, listener) = callbacks();
        let chords = ["C", "G", "Am", "F", "C", "G", "Am", "F"];
        let handle = player
            .play_progression(&chords, Instrument::Piano, on_chord, on_complete)
            .unwrap();

        assert_eq!(listener.chords.recv_timeout(EVENT_LIMIT), Ok(0));
        player.stop_playback();
        assert_eq!(handle.state(), PlaybackState::Cancelled);
        assert_eq!(listener.completions.load(Ordering::SeqCst), 1);

        let before: Vec<usize> = listener.chords.try_iter().collect();
        assert!(before.len() < chords.len() - 1);

        // Nothing arrives once stop_playback has returned
        thread::sleep(Duration::from_millis(400));
        assert!(listener.chords.try_recv().is_err());
        assert_eq!(listener.completions.load(Ordering::SeqCst), 1);
        assert!(!player.is_playing());
    });
}

#[test]
fn test_replacement_cancels_first_once() {
    run_guarded(|| {
        let player = threaded_player();
        let (first_chord, first_complete, first) = callbacks();
        let (second_chord, second_complete, second) = callbacks();

        player
            .play_progression(
                &["Am", "F", "C", "G", "Am", "F"],
                Instrument::Guitar,
                first_chord,
                first_complete,
            )
            .unwrap();
        assert_eq!(first.chords.recv_timeout(EVENT_LIMIT), Ok(0));

        player
            .play_progression(&["C", "F", "G"], Instrument::Piano, second_chord, second_complete)
            .unwrap();
        assert_eq!(first.completions.load(Ordering::SeqCst), 1);
        let _ = first.chords.try_iter().count();

        assert_eq!(second.finished.recv_timeout(EVENT_LIMIT), Ok(()));
        let seen: Vec<usize> = second.chords.try_iter().collect();
        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(second.completions.load(Ordering::SeqCst), 1);

        assert!(first.chords.try_recv().is_err());
        assert_eq!(first.completions.load(Ordering::SeqCst), 1);
    });
}

#[test]
fn test_chord_callback_restarts_playback() {
    run_guarded(|| {
        let player = Arc::new(threaded_player());
        let (first_complete_tx, first_complete_rx) = unbounded();
        let (restart_chord, restart_complete, restart) = callbacks();

        let weak: Weak<ProgressionPlayer> = Arc::downgrade(&player);
        let mut pending = Some((restart_chord, restart_complete));
        player
            .play_progression(
                &["C", "G", "Am", "F"],
                Instrument::Piano,
                move |index| {
                    if index != 1 {
                        return;
                    }
                    if let (Some(player), Some((on_chord, on_complete))) =
                        (weak.upgrade(), pending.take())
                    {
                        player
                            .play_progression(&["F", "G"], Instrument::Piano, on_chord, on_complete)
                            .unwrap();
                    }
                },
                move || {
                    let _ = first_complete_tx.send(());
                },
            )
            .unwrap();

        assert_eq!(restart.finished.recv_timeout(EVENT_LIMIT), Ok(()));
        let seen: Vec<usize> = restart.chords.try_iter().collect();
        assert_eq!(seen, vec![0, 1]);
        assert_eq!(restart.completions.load(Ordering::SeqCst), 1);
        assert_eq!(first_complete_rx.try_iter().count(), 1);
        assert_eq!(player.state(), PlaybackState::Idle);
    });
}

#[test]
fn test_drop_with_active_playback() {
    run_guarded(|| {
        let player = threaded_player();
        let (on_chord, on_complete, listener) = callbacks();
        let handle = player
            .play_progression(&["C", "G", "Am", "F"], Instrument::Guitar, on_chord, on_complete)
            .unwrap();

        drop(player);
        assert_eq!(handle.state(), PlaybackState::Cancelled);
        assert_eq!(listener.completions.load(Ordering::SeqCst), 1);
    });
}
