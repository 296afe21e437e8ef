use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Cue, Phase};

/// Every state change of a running timer produces an Event.
/// Hosts either consume them directly or route them through
/// [`crate::timer::dispatch`] to observer callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// One second elapsed while playing.
    Tick {
        remaining_secs: u32,
        phase: Phase,
        step_index: usize,
        /// Seconds of the whole routine behind us after this tick.
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
        step_index: usize,
        at: DateTime<Utc>,
    },
    /// The timer moved to another step on its own (end of rest, or a zero rest).
    StepAdvanced {
        from_step: usize,
        to_step: usize,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// An audio cue should be played. Best effort.
    CueRequested {
        cue: Cue,
        at: DateTime<Utc>,
    },
    Played {
        step_index: usize,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    Paused {
        step_index: usize,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// A step ran out with auto-advance off; playback stopped on it.
    Stopped {
        step_index: usize,
        at: DateTime<Utc>,
    },
    Skipped {
        from_step: usize,
        to_step: usize,
        /// Phase the timer was in before the skip.
        from_phase: Phase,
        at: DateTime<Utc>,
    },
    Restarted {
        at: DateTime<Utc>,
    },
    /// Last step finished. Emitted once per run.
    Completed {
        steps: usize,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        is_playing: bool,
        step_index: usize,
        step_count: usize,
        step_name: String,
        remaining_secs: u32,
        step_total_secs: u32,
        elapsed_secs: u64,
        total_secs: u64,
        at: DateTime<Utc>,
    },
}
