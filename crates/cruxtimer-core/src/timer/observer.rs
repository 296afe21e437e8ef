use super::cue::{emit_cue, CueSink};
use super::engine::Phase;
use crate::events::Event;

/// Host callbacks for a running timer.
///
/// Every method defaults to a no-op so hosts implement only what they
/// display. Closing the timer view is the host's business; the engine never
/// asks for it.
pub trait TimerObserver {
    /// Fired once per second while playing.
    fn on_tick(&mut self, _remaining_secs: u32, _phase: Phase, _step_index: usize) {}

    /// Fired on every phase transition, including a rest bypassed by a skip.
    fn on_phase_change(&mut self, _from: Phase, _to: Phase, _step_index: usize) {}

    /// Fired when the current step changes for any reason.
    fn on_step_change(&mut self, _step_index: usize) {}

    /// Fired exactly once per run, when the last step runs out.
    fn on_complete(&mut self) {}

    /// Raw access to every event, after the specific callbacks.
    fn on_event(&mut self, _event: &Event) {}
}

impl TimerObserver for () {}

/// Route engine events to cues and observer callbacks.
pub fn dispatch(events: &[Event], cues: &dyn CueSink, observer: &mut dyn TimerObserver) {
    for event in events {
        match event {
            Event::Tick {
                remaining_secs,
                phase,
                step_index,
                ..
            } => observer.on_tick(*remaining_secs, *phase, *step_index),
            Event::PhaseChanged {
                from,
                to,
                step_index,
                ..
            } => observer.on_phase_change(*from, *to, *step_index),
            Event::StepAdvanced { to_step, .. } => observer.on_step_change(*to_step),
            Event::Skipped {
                to_step,
                from_phase,
                ..
            } => {
                if *from_phase != Phase::Exercising {
                    observer.on_phase_change(*from_phase, Phase::Exercising, *to_step);
                }
                observer.on_step_change(*to_step);
            }
            Event::Restarted { .. } => observer.on_step_change(0),
            Event::CueRequested { cue, .. } => emit_cue(cues, *cue),
            Event::Completed { .. } => observer.on_complete(),
            _ => {}
        }
        observer.on_event(event);
    }
}
