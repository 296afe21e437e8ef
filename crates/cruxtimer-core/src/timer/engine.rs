//! Timer engine implementation.
//!
//! The engine is a tick-driven state machine over a [`Timeline`]. It owns no
//! clock and spawns nothing - the caller invokes `tick()` once per second
//! while playing and forwards manual controls as they arrive.
//!
//! ## State Transitions
//!
//! ```text
//! Exercising --(0s, last step)--------> Finished
//! Exercising --(0s, auto-advance)-----> Resting --(0s)--> Exercising (next step)
//! Exercising --(0s, manual)-----------> Exercising (stopped, same step)
//! ```
//!
//! Play/pause is a flag alongside the phase, not a phase of its own.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(parse_routine(text), TimerSettings::default())?;
//! engine.toggle_play();
//! // Once per second:
//! let events = engine.tick();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::cue::Cue;
use crate::error::ValidationError;
use crate::events::Event;
use crate::routine::{Step, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Exercising,
    Resting,
    Finished,
}

/// Run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Insert a rest and move on by itself when a step runs out.
    pub auto_advance: bool,
    /// Rest between exercises, only used with `auto_advance`.
    pub rest_secs: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            auto_advance: true,
            rest_secs: 10,
        }
    }
}

/// Mutable run state. Owned by exactly one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub step_index: usize,
    pub phase: Phase,
    pub remaining_secs: u32,
    pub is_playing: bool,
}

/// Core timer engine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    timeline: Timeline,
    settings: TimerSettings,
    state: RunState,
    /// Set once `Completed` has been emitted; cleared by `restart()`.
    completion_reported: bool,
}

impl TimerEngine {
    /// Create an engine paused on the first step.
    ///
    /// An empty timeline cannot be played and is rejected, as is a
    /// hand-built one containing a zero-length step.
    pub fn new(timeline: Timeline, settings: TimerSettings) -> Result<Self, ValidationError> {
        let first = timeline
            .get(0)
            .map(|s| s.duration_secs)
            .ok_or(ValidationError::EmptyTimeline)?;
        if let Some(index) = timeline.iter().position(|s| s.duration_secs == 0) {
            return Err(ValidationError::InvalidValue {
                field: "duration_secs".into(),
                message: format!("step {index} has zero duration"),
            });
        }
        Ok(Self {
            timeline,
            settings,
            state: RunState {
                step_index: 0,
                phase: Phase::Exercising,
                remaining_secs: first,
                is_playing: false,
            },
            completion_reported: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn step_index(&self) -> usize {
        self.state.step_index
    }

    pub fn remaining_secs(&self) -> u32 {
        self.state.remaining_secs
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn is_finished(&self) -> bool {
        self.state.phase == Phase::Finished
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn current_step(&self) -> &Step {
        // step_index is kept in bounds and the timeline is never empty
        &self.timeline.steps()[self.state.step_index]
    }

    fn is_last_step(&self) -> bool {
        self.state.step_index + 1 >= self.timeline.len()
    }

    fn duration_of(&self, index: usize) -> u32 {
        self.timeline.get(index).map(|s| s.duration_secs).unwrap_or(0)
    }

    pub fn total_secs(&self) -> u64 {
        self.timeline.total_secs()
    }

    /// Seconds of the whole routine already behind us.
    pub fn elapsed_secs(&self) -> u64 {
        let index = self.state.step_index;
        match self.state.phase {
            Phase::Exercising => {
                let done = self.duration_of(index).saturating_sub(self.state.remaining_secs);
                self.timeline.cumulative_secs(index) + u64::from(done)
            }
            Phase::Resting => self.timeline.cumulative_secs(index + 1),
            Phase::Finished => self.timeline.total_secs(),
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        let total = match self.state.phase {
            Phase::Exercising => self.duration_of(self.state.step_index),
            Phase::Resting => self.settings.rest_secs,
            Phase::Finished => return 1.0,
        };
        if total == 0 {
            return 0.0;
        }
        1.0 - (f64::from(self.state.remaining_secs) / f64::from(total))
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let step = self.current_step();
        Event::StateSnapshot {
            phase: self.state.phase,
            is_playing: self.state.is_playing,
            step_index: self.state.step_index,
            step_count: self.timeline.len(),
            step_name: step.name.clone(),
            remaining_secs: self.state.remaining_secs,
            step_total_secs: step.duration_secs,
            elapsed_secs: self.elapsed_secs(),
            total_secs: self.total_secs(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Flip play/pause. Phase, step and remaining time are untouched.
    /// No-op once finished.
    pub fn toggle_play(&mut self) -> Option<Event> {
        if self.state.is_playing {
            self.pause()
        } else {
            self.play()
        }
    }

    pub fn play(&mut self) -> Option<Event> {
        if self.state.is_playing || self.is_finished() {
            return None;
        }
        self.state.is_playing = true;
        Some(Event::Played {
            step_index: self.state.step_index,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_playing {
            return None;
        }
        self.state.is_playing = false;
        Some(Event::Paused {
            step_index: self.state.step_index,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Jump to the next exercise. A running rest is abandoned.
    /// No-op on the last step.
    pub fn skip_forward(&mut self) -> Option<Event> {
        if self.is_last_step() {
            return None;
        }
        let from_step = self.state.step_index;
        let from_phase = self.state.phase;
        self.enter_step(from_step + 1);
        Some(Event::Skipped {
            from_step,
            to_step: self.state.step_index,
            from_phase,
            at: Utc::now(),
        })
    }

    /// Jump back one exercise. No-op on the first step.
    pub fn skip_backward(&mut self) -> Option<Event> {
        if self.state.step_index == 0 {
            return None;
        }
        let from_step = self.state.step_index;
        let from_phase = self.state.phase;
        self.enter_step(from_step - 1);
        Some(Event::Skipped {
            from_step,
            to_step: self.state.step_index,
            from_phase,
            at: Utc::now(),
        })
    }

    /// Back to the first step, paused. Starts a new run.
    pub fn restart(&mut self) -> Option<Event> {
        self.state = RunState {
            step_index: 0,
            phase: Phase::Exercising,
            remaining_secs: self.duration_of(0),
            is_playing: false,
        };
        self.completion_reported = false;
        Some(Event::Restarted { at: Utc::now() })
    }

    /// Advance one second. Call once per second; does nothing while paused
    /// or after the routine finished.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.state.is_playing || self.is_finished() {
            return events;
        }

        if self.state.remaining_secs > 0 {
            if let Some(cue) = Cue::for_remaining(self.state.remaining_secs) {
                events.push(Event::CueRequested { cue, at: Utc::now() });
            }
            self.state.remaining_secs -= 1;
            trace!(
                remaining_secs = self.state.remaining_secs,
                phase = ?self.state.phase,
                step_index = self.state.step_index,
                "tick"
            );
            events.push(Event::Tick {
                remaining_secs: self.state.remaining_secs,
                phase: self.state.phase,
                step_index: self.state.step_index,
                elapsed_secs: self.elapsed_secs(),
                at: Utc::now(),
            });
        }

        if self.state.remaining_secs == 0 {
            self.finish_phase(&mut events);
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish_phase(&mut self, events: &mut Vec<Event>) {
        match self.state.phase {
            Phase::Exercising if self.is_last_step() => {
                self.set_phase(Phase::Finished, events);
                self.state.is_playing = false;
                if !self.completion_reported {
                    self.completion_reported = true;
                    events.push(Event::CueRequested {
                        cue: Cue::Complete,
                        at: Utc::now(),
                    });
                    events.push(Event::Completed {
                        steps: self.timeline.len(),
                        total_secs: self.timeline.total_secs(),
                        at: Utc::now(),
                    });
                }
            }
            Phase::Exercising if self.settings.auto_advance => {
                if self.settings.rest_secs == 0 {
                    self.advance(events);
                } else {
                    self.set_phase(Phase::Resting, events);
                    self.state.remaining_secs = self.settings.rest_secs;
                }
            }
            Phase::Exercising => {
                self.state.is_playing = false;
                events.push(Event::Stopped {
                    step_index: self.state.step_index,
                    at: Utc::now(),
                });
            }
            Phase::Resting => {
                self.set_phase(Phase::Exercising, events);
                self.advance(events);
            }
            Phase::Finished => {}
        }
    }

    fn advance(&mut self, events: &mut Vec<Event>) {
        let from_step = self.state.step_index;
        self.enter_step(from_step + 1);
        events.push(Event::StepAdvanced {
            from_step,
            to_step: self.state.step_index,
            duration_secs: self.state.remaining_secs,
            at: Utc::now(),
        });
    }

    fn enter_step(&mut self, index: usize) {
        self.state.step_index = index;
        self.state.phase = Phase::Exercising;
        self.state.remaining_secs = self.duration_of(index);
    }

    fn set_phase(&mut self, to: Phase, events: &mut Vec<Event>) {
        let from = self.state.phase;
        self.state.phase = to;
        events.push(Event::PhaseChanged {
            from,
            to,
            step_index: self.state.step_index,
            at: Utc::now(),
        });
    }
}
