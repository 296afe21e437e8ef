//! Integration tests for the timer engine and runner.

use std::time::Duration;

use cruxtimer_core::routine::Step;
use cruxtimer_core::timer::{dispatch, SilentCues};
use cruxtimer_core::{
    parse_routine, Event, Phase, RunOutcome, RunState, Timeline, TimerCommand, TimerEngine,
    TimerObserver, TimerRunner, TimerSettings,
};
use proptest::prelude::*;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy)]
enum Op {
    Tick,
    Toggle,
    Forward,
    Backward,
    Restart,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => Just(Op::Tick),
        1 => Just(Op::Toggle),
        1 => Just(Op::Forward),
        1 => Just(Op::Backward),
        1 => Just(Op::Restart),
    ]
}

fn timeline(durations: &[u32]) -> Timeline {
    Timeline::new(
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| Step {
                name: format!("step {i}"),
                duration_secs: d,
                source_line: format!("step {i} {d}s"),
            })
            .collect(),
    )
}

fn apply(engine: &mut TimerEngine, op: Op) -> Vec<Event> {
    match op {
        Op::Tick => engine.tick(),
        Op::Toggle => engine.toggle_play().into_iter().collect(),
        Op::Forward => engine.skip_forward().into_iter().collect(),
        Op::Backward => engine.skip_backward().into_iter().collect(),
        Op::Restart => engine.restart().into_iter().collect(),
    }
}

proptest! {
    #[test]
    fn prop_restart_is_idempotent(
        durations in prop::collection::vec(1u32..30, 1..6),
        auto_advance in any::<bool>(),
        rest_secs in 0u32..5,
        ops in prop::collection::vec(op(), 0..80),
    ) {
        let settings = TimerSettings { auto_advance, rest_secs };
        let mut engine = TimerEngine::new(timeline(&durations), settings).unwrap();
        for op in ops {
            apply(&mut engine, op);
        }
        engine.restart();
        let expected = RunState {
            step_index: 0,
            phase: Phase::Exercising,
            remaining_secs: durations[0],
            is_playing: false,
        };
        prop_assert_eq!(engine.state(), expected);
        engine.restart();
        prop_assert_eq!(engine.state(), expected);
    }

    #[test]
    fn prop_ticks_make_monotonic_progress(
        durations in prop::collection::vec(1u32..30, 1..6),
        auto_advance in any::<bool>(),
        rest_secs in 0u32..5,
        ops in prop::collection::vec(op(), 0..120),
    ) {
        let settings = TimerSettings { auto_advance, rest_secs };
        let mut engine = TimerEngine::new(timeline(&durations), settings).unwrap();
        for op in ops {
            let before = engine.state();
            apply(&mut engine, op);
            let after = engine.state();
            prop_assert!(after.step_index < durations.len());
            if matches!(op, Op::Tick) && before.is_playing && before.phase != Phase::Finished {
                let same_place = before.phase == after.phase && before.step_index == after.step_index;
                if same_place && before.remaining_secs > 0 && after.is_playing {
                    prop_assert_eq!(after.remaining_secs, before.remaining_secs - 1);
                }
                prop_assert!(!same_place || after.remaining_secs <= before.remaining_secs);
            }
        }
    }

    #[test]
    fn prop_completion_at_most_once_per_run(
        durations in prop::collection::vec(1u32..10, 1..5),
        rest_secs in 0u32..3,
        ops in prop::collection::vec(op(), 0..200),
    ) {
        let settings = TimerSettings { auto_advance: true, rest_secs };
        let mut engine = TimerEngine::new(timeline(&durations), settings).unwrap();
        let mut completions_this_run = 0;
        for op in ops {
            if matches!(op, Op::Restart) {
                completions_this_run = 0;
            }
            for event in apply(&mut engine, op) {
                if let Event::Completed { .. } = event {
                    completions_this_run += 1;
                    prop_assert!(engine.is_finished());
                    prop_assert_eq!(engine.step_index(), durations.len() - 1);
                }
            }
            prop_assert!(completions_this_run <= 1);
        }
    }
}

#[test]
fn test_uninterrupted_run_completes_exactly_once() {
    let settings = TimerSettings {
        auto_advance: true,
        rest_secs: 3,
    };
    let mut engine =
        TimerEngine::new(parse_routine("a 5 sec\nb 4 sec\nc 6 sec"), settings).unwrap();
    engine.toggle_play();

    let mut completions = 0;
    let mut ticks = 0;
    while !engine.is_finished() {
        ticks += 1;
        for event in engine.tick() {
            if matches!(event, Event::Completed { .. }) {
                completions += 1;
            }
        }
        assert!(ticks < 100, "run never finished");
    }
    assert_eq!(completions, 1);
    assert_eq!(ticks, 5 + 3 + 4 + 3 + 6);
    assert_eq!(engine.elapsed_secs(), engine.total_secs());
    assert!(engine.tick().is_empty());
}

#[test]
fn test_manual_mode_waits_for_skip() {
    let settings = TimerSettings {
        auto_advance: false,
        rest_secs: 3,
    };
    let mut engine = TimerEngine::new(parse_routine("a 2 sec\nb 2 sec"), settings).unwrap();
    engine.toggle_play();
    engine.tick();
    let events = engine.tick();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::Stopped { step_index: 0, .. })));
    assert!(!engine.is_playing());

    engine.skip_forward();
    assert_eq!(engine.step_index(), 1);
    assert_eq!(engine.remaining_secs(), 2);
    engine.toggle_play();
    engine.tick();
    engine.tick();
    assert!(engine.is_finished());
}

#[derive(Default)]
struct Counter {
    ticks: u32,
    completions: u32,
    snapshots: u32,
}

impl TimerObserver for Counter {
    fn on_tick(&mut self, _remaining_secs: u32, _phase: Phase, _step_index: usize) {
        self.ticks += 1;
    }

    fn on_complete(&mut self) {
        self.completions += 1;
    }

    fn on_event(&mut self, event: &Event) {
        if matches!(event, Event::StateSnapshot { .. }) {
            self.snapshots += 1;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_runner_obeys_commands() {
    let settings = TimerSettings {
        auto_advance: true,
        rest_secs: 5,
    };
    let engine = TimerEngine::new(parse_routine("a 3 sec\nb 3 sec\nc 3 sec"), settings).unwrap();
    let mut runner = TimerRunner::new(engine, SilentCues, Counter::default());
    let (tx, rx) = mpsc::channel(8);

    let driver = tokio::spawn(async move {
        tx.send(TimerCommand::TogglePlay).await.unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        // resting after step a; skip straight to b, then jump to c
        tx.send(TimerCommand::SkipForward).await.unwrap();
        tx.send(TimerCommand::SkipForward).await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        drop(tx);
    });

    let outcome = runner.run(rx).await;
    assert_eq!(outcome, RunOutcome::Completed);
    let (engine, _, counter) = runner.into_parts();
    assert!(engine.is_finished());
    assert_eq!(counter.completions, 1);
    assert_eq!(counter.snapshots, 1);
    assert_eq!(counter.ticks, 6);
    driver.abort();
}

#[tokio::test(start_paused = true)]
async fn test_runner_close_stops_ticking() {
    let engine =
        TimerEngine::new(parse_routine("a 1 min"), TimerSettings::default()).unwrap();
    let mut runner = TimerRunner::new(engine, SilentCues, Counter::default());
    let (tx, rx) = mpsc::channel(8);
    tx.send(TimerCommand::TogglePlay).await.unwrap();

    let closer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10_500)).await;
        tx.send(TimerCommand::Close).await.unwrap();
    });

    assert_eq!(runner.run(rx).await, RunOutcome::Closed);
    assert_eq!(runner.engine().remaining_secs(), 50);
    assert_eq!(runner.observer().ticks, 10);
    closer.await.unwrap();
}

#[test]
fn test_dispatch_with_unit_observer() {
    let mut engine = TimerEngine::new(parse_routine("a 2 sec"), TimerSettings::default()).unwrap();
    engine.toggle_play();
    let events = engine.tick();
    dispatch(&events, &SilentCues, &mut ());
    assert_eq!(engine.remaining_secs(), 1);
}
