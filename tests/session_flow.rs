//! Integration tests for the session lifecycle over a file-backed store.

use chrono::{DateTime, Duration, FixedOffset};
use detox::Error;
use detox::core::{
    Controller, Event, ManualClock, ManualNotifier, STORAGE_KEY, SessionState, SessionStore,
};
use detox::storage::{FileBackend, KeyValueStore, MemoryBackend};
use tokio::sync::mpsc::UnboundedReceiver;
use proptest::prelude::*;
use std::time::Duration as StdDuration;
use tempfile::TempDir;

const TICK: StdDuration = StdDuration::from_secs(1);

fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn file_store(dir: &TempDir, clock: &ManualClock) -> SessionStore<FileBackend, ManualClock> {
    let backend = FileBackend::new(dir.path().to_path_buf()).unwrap();
    SessionStore::with_clock(backend, clock.clone())
}

/// The user comes back to the device; apply whatever the notifier queued.
fn come_back<K: KeyValueStore>(
    controller: &mut Controller<K, ManualClock>,
    events: &mut UnboundedReceiver<Event>,
    notifier: &ManualNotifier,
) {
    notifier.notify();
    while let Ok(event) = events.try_recv() {
        controller.handle(event);
    }
}

#[test]
fn full_flow_start_return_continue_end() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(at("2026-03-04T21:00:00+09:00"));
    let notifier = ManualNotifier::new();
    let (mut controller, mut events) =
        Controller::new(file_store(&dir, &clock), notifier.clone(), TICK).unwrap();

    // Step 1: put the phone down
    let session = controller.start().unwrap();
    assert_eq!(controller.state(), SessionState::Active);

    // Step 2: user comes back after 40 minutes
    clock.advance(Duration::minutes(40));
    come_back(&mut controller, &mut events, &notifier);
    assert_eq!(controller.state(), SessionState::Returning);
    assert_eq!(controller.elapsed_ms(), 40 * 60_000);

    // Step 3: keeps going for another 20
    assert!(controller.continue_session());
    assert!(controller.store().all_sessions().unwrap().is_empty());
    clock.advance(Duration::minutes(20));
    come_back(&mut controller, &mut events, &notifier);

    // Step 4: done
    let ended = controller.end().unwrap().unwrap();
    assert_eq!(ended.id, session.id);
    assert_eq!(ended.duration, 60 * 60_000);
    assert_eq!(controller.state(), SessionState::Idle);

    let summary = controller.store().stats_summary().unwrap();
    assert_eq!(summary.today.session_count, 1);
    assert_eq!(summary.today.total_duration, 60 * 60_000);
    assert_eq!(summary.weekly_total_ms, 60 * 60_000);
    assert_eq!(summary.streak_days, 1);
}

#[test]
fn record_survives_reopening_the_store() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(at("2026-03-04T08:00:00+09:00"));

    let store = file_store(&dir, &clock);
    for minutes in [5, 10, 15] {
        store.start_session().unwrap();
        clock.advance(Duration::minutes(minutes));
        store.end_session().unwrap();
    }
    let open = store.start_session().unwrap();
    let written = store.load().unwrap();

    let reopened = file_store(&dir, &clock);
    let read = reopened.load().unwrap();
    assert_eq!(read, written);
    assert_eq!(read.current_session, Some(open));
    let durations: Vec<i64> = read.sessions.iter().map(|s| s.duration).collect();
    assert_eq!(durations, vec![5 * 60_000, 10 * 60_000, 15 * 60_000]);
}

#[test]
fn restart_recovers_session_as_returning() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(at("2026-03-04T08:00:00+09:00"));

    {
        let (mut controller, _events) =
            Controller::new(file_store(&dir, &clock), ManualNotifier::new(), TICK).unwrap();
        controller.start().unwrap();
    }

    clock.advance(Duration::hours(3));
    let (mut controller, _events) =
        Controller::new(file_store(&dir, &clock), ManualNotifier::new(), TICK).unwrap();
    assert_eq!(controller.state(), SessionState::Returning);
    assert_eq!(controller.elapsed_ms(), 3 * 3_600_000);

    let ended = controller.end().unwrap().unwrap();
    assert_eq!(ended.duration, 3 * 3_600_000);
}

#[test]
fn corrupted_file_behaves_as_first_run() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(at("2026-03-04T08:00:00+09:00"));
    let backend = FileBackend::new(dir.path().to_path_buf()).unwrap();
    backend.set(STORAGE_KEY, b"{\"sessions\": [").unwrap();

    let (mut controller, _events) =
        Controller::new(file_store(&dir, &clock), ManualNotifier::new(), TICK).unwrap();
    assert_eq!(controller.state(), SessionState::Idle);

    controller.start().unwrap();
    assert!(controller.store().current_session().unwrap().is_some());
}

#[test]
fn second_start_is_rejected_across_processes() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(at("2026-03-04T08:00:00+09:00"));

    let first = file_store(&dir, &clock).start_session().unwrap();
    let err = file_store(&dir, &clock).start_session().unwrap_err();
    assert!(matches!(err, Error::SessionAlreadyOpen(id) if id == first.id));
}

#[derive(Debug, Clone)]
enum Op {
    Start,
    End,
    Foreground,
    Continue,
    Wait(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        Just(Op::End),
        Just(Op::Foreground),
        Just(Op::Continue),
        (1u32..7200).prop_map(Op::Wait),
    ]
}

proptest! {
    #[test]
    fn at_most_one_session_is_ever_open(ops in prop::collection::vec(op(), 1..40)) {
        let clock = ManualClock::new(at("2026-03-04T08:00:00+09:00"));
        let store = SessionStore::with_clock(MemoryBackend::new(), clock.clone());
        let notifier = ManualNotifier::new();
        let (mut controller, mut events) =
            Controller::new(store, notifier.clone(), TICK).unwrap();

        let mut open = false;
        let mut completed = 0;

        for op in ops {
            match op {
                Op::Start => {
                    let started = controller.start().is_ok();
                    prop_assert_eq!(started, !open);
                    open = true;
                }
                Op::End => {
                    let closed = controller.end().unwrap();
                    prop_assert_eq!(closed.is_some(), open);
                    if closed.is_some() {
                        completed += 1;
                    }
                    open = false;
                }
                Op::Foreground => come_back(&mut controller, &mut events, &notifier),
                Op::Continue => {
                    controller.continue_session();
                }
                Op::Wait(secs) => clock.advance(Duration::seconds(i64::from(secs))),
            }

            let data = controller.store().load().unwrap();
            prop_assert_eq!(data.current_session.is_some(), open);
            prop_assert_eq!(controller.state() == SessionState::Idle, !open);
            prop_assert_eq!(data.sessions.len(), completed);
            for session in &data.sessions {
                prop_assert!(!session.is_open());
                prop_assert_eq!(session.duration, session.end_time.unwrap() - session.start_time);
            }
        }
    }
}
