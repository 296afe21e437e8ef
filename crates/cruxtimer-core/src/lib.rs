//! # cruxtimer Core Library
//!
//! Turns a free-text training routine into a timed sequence of exercises and
//! drives an interval timer over it. The CLI binary is a thin shell over this
//! library.
//!
//! ## Architecture
//!
//! - **Routine parser**: heuristic, line-oriented text to [`Timeline`]
//!   conversion using an ordered list of duration matcher rules
//! - **Timer engine**: a tick-driven state machine that requires the caller
//!   to invoke `tick()` once per second
//! - **Runner**: a tokio task pairing the engine with a 1 Hz interval and a
//!   command channel
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`parse_routine`]: Routine text to timeline
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerRunner`]: Async driver with observer callbacks and audio cues
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod routine;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, CueError, ValidationError};
pub use events::Event;
pub use routine::{
    parse_routine, parse_routine_report, read_routine_file, ParseReport, Step, Timeline,
};
pub use storage::Config;
pub use timer::{
    Cue, CueSink, Phase, RunOutcome, RunState, TimerCommand, TimerEngine, TimerObserver,
    TimerRunner, TimerSettings,
};
