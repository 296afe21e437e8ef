//! Audio cues.
//!
//! Cues are fire-and-forget. A [`CueSink`] may fail (no audio device, closed
//! terminal) and the failure is logged and dropped by [`emit_cue`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Short low beep for the last seconds of a countdown.
    Countdown,
    /// Longer, higher beep as a phase runs out.
    StepEnd,
    /// Whole routine finished.
    Complete,
}

impl Cue {
    /// Cue due before decrementing from `remaining_secs`, if any.
    pub fn for_remaining(remaining_secs: u32) -> Option<Cue> {
        match remaining_secs {
            2..=4 => Some(Cue::Countdown),
            1 => Some(Cue::StepEnd),
            _ => None,
        }
    }

    pub fn frequency_hz(self) -> u32 {
        match self {
            Cue::Countdown => 440,
            Cue::StepEnd => 880,
            Cue::Complete => 660,
        }
    }

    pub fn duration_ms(self) -> u32 {
        match self {
            Cue::Countdown => 120,
            Cue::StepEnd => 400,
            Cue::Complete => 800,
        }
    }
}

/// Something that can make a noise.
pub trait CueSink {
    fn play(&self, cue: Cue) -> Result<(), CueError>;
}

/// Drops every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCues;

impl CueSink for SilentCues {
    fn play(&self, _cue: Cue) -> Result<(), CueError> {
        Ok(())
    }
}

impl<S: CueSink + ?Sized> CueSink for Box<S> {
    fn play(&self, cue: Cue) -> Result<(), CueError> {
        (**self).play(cue)
    }
}

/// Play `cue`, swallowing any failure.
pub fn emit_cue(sink: &dyn CueSink, cue: Cue) {
    if let Err(e) = sink.play(cue) {
        debug!(?cue, error = %e, "cue dropped");
    }
}
