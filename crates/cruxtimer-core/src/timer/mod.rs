mod cue;
mod engine;
mod format;
mod observer;
mod runner;

pub use cue::{emit_cue, Cue, CueSink, SilentCues};
pub use engine::{Phase, RunState, TimerEngine, TimerSettings};
pub use format::{format_clock, format_progress};
pub use observer::{dispatch, TimerObserver};
pub use runner::{RunOutcome, TimerCommand, TimerRunner};
