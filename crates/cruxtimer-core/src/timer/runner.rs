//! Async driver for a [`TimerEngine`].
//!
//! One task, one engine: a 1 Hz interval feeds `tick()` while playing and a
//! command channel feeds manual controls. The interval lives inside `run()`
//! and is dropped on every exit, so no tick outlives the run.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::cue::CueSink;
use super::engine::TimerEngine;
use super::observer::{dispatch, TimerObserver};
use crate::events::Event;

const TICK: Duration = Duration::from_secs(1);

/// Manual controls accepted by a running timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    TogglePlay,
    SkipForward,
    SkipBackward,
    Restart,
    /// The host view is closing.
    Close,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The last step ran out.
    Completed,
    /// `Close` was received or every command sender was dropped.
    Closed,
}

pub struct TimerRunner<S, O> {
    engine: TimerEngine,
    cues: S,
    observer: O,
}

impl<S: CueSink, O: TimerObserver> TimerRunner<S, O> {
    pub fn new(engine: TimerEngine, cues: S, observer: O) -> Self {
        Self {
            engine,
            cues,
            observer,
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_parts(self) -> (TimerEngine, S, O) {
        (self.engine, self.cues, self.observer)
    }

    /// Drive the engine until it completes or the host closes it.
    pub async fn run(&mut self, mut commands: mpsc::Receiver<TimerCommand>) -> RunOutcome {
        let mut interval = time::interval_at(Instant::now() + TICK, TICK);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            steps = self.engine.timeline().len(),
            total_secs = self.engine.total_secs(),
            "timer run started"
        );
        let snapshot = self.engine.snapshot();
        self.observer.on_event(&snapshot);

        loop {
            tokio::select! {
                _ = interval.tick(), if self.engine.is_playing() => {
                    let events = self.engine.tick();
                    dispatch(&events, &self.cues, &mut self.observer);
                    if self.engine.is_finished() {
                        info!("timer run completed");
                        return RunOutcome::Completed;
                    }
                }
                command = commands.recv() => {
                    let command = match command {
                        Some(TimerCommand::Close) | None => {
                            info!(step_index = self.engine.step_index(), "timer run closed");
                            return RunOutcome::Closed;
                        }
                        Some(command) => command,
                    };
                    let was_playing = self.engine.is_playing();
                    let event = self.apply(command);
                    let moved = matches!(
                        event,
                        Some(Event::Skipped { .. }) | Some(Event::Restarted { .. })
                    );
                    if let Some(event) = event {
                        dispatch(std::slice::from_ref(&event), &self.cues, &mut self.observer);
                    }
                    if self.engine.is_playing() && (!was_playing || moved) {
                        // first tick of a new step or a resumed one lands a full second later
                        interval.reset();
                    }
                }
            }
        }
    }

    fn apply(&mut self, command: TimerCommand) -> Option<Event> {
        debug!(?command, "timer command");
        match command {
            TimerCommand::TogglePlay => self.engine.toggle_play(),
            TimerCommand::SkipForward => self.engine.skip_forward(),
            TimerCommand::SkipBackward => self.engine.skip_backward(),
            TimerCommand::Restart => self.engine.restart(),
            TimerCommand::Close => None,
        }
    }
}
