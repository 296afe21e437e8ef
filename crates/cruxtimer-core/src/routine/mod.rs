//! Routine text to timeline parsing.
//!
//! Routines arrive as free text from a generator with no fixed format, so
//! parsing is heuristic: every surviving line becomes a [`Step`] and nothing
//! is ever rejected as malformed. A routine with no surviving lines yields an
//! empty [`Timeline`], which the timer refuses to play.
//!
//! ```ignore
//! let timeline = parse_routine("Warmup\n1. Cat-cow - 1 min\n30 sec wrist circles");
//! assert_eq!(timeline.len(), 2);
//! ```

mod clean;
mod name;
mod rules;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

pub use clean::{is_section_header, strip_list_marker};
pub use name::{derive_name, MAX_NAME_CHARS, PREFIX_HINT_COLUMN};
pub use rules::{
    find_duration, match_minutes, match_range, match_reps, match_seconds, DurationHint,
    DurationRule, RuleKind, DEFAULT_DURATION_SECS, RULES, SECS_PER_REP,
};

/// One parsed exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    /// Always at least one second.
    pub duration_secs: u32,
    /// The cleaned line the step came from.
    pub source_line: String,
}

/// Ordered, read-only list of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    steps: Vec<Step>,
}

impl Timeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn total_secs(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.duration_secs)).sum()
    }

    /// Seconds covered by steps `0..index`.
    pub fn cumulative_secs(&self, index: usize) -> u64 {
        self.steps
            .iter()
            .take(index)
            .map(|s| u64::from(s.duration_secs))
            .sum()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Why a line produced no step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipReason {
    Blank,
    Header,
}

/// Per-line parse diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum LineOutcome {
    Skipped {
        line_no: usize,
        reason: SkipReason,
    },
    Parsed {
        line_no: usize,
        step_index: usize,
        /// `None` when the default duration was used.
        rule: Option<RuleKind>,
    },
}

/// A timeline together with what happened to each input line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseReport {
    pub timeline: Timeline,
    pub lines: Vec<LineOutcome>,
}

/// Parse a routine into a timeline.
pub fn parse_routine(text: &str) -> Timeline {
    parse_routine_report(text).timeline
}

/// Parse a routine and keep per-line diagnostics.
pub fn parse_routine_report(text: &str) -> ParseReport {
    let mut steps = Vec::new();
    let mut lines = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            lines.push(LineOutcome::Skipped {
                line_no,
                reason: SkipReason::Blank,
            });
            continue;
        }
        if is_section_header(trimmed) {
            debug!(line_no, line = trimmed, "skipping section header");
            lines.push(LineOutcome::Skipped {
                line_no,
                reason: SkipReason::Header,
            });
            continue;
        }

        let (step, rule) = parse_line(trimmed);
        debug!(
            line_no,
            name = %step.name,
            duration_secs = step.duration_secs,
            rule = ?rule,
            "parsed routine line"
        );
        lines.push(LineOutcome::Parsed {
            line_no,
            step_index: steps.len(),
            rule,
        });
        steps.push(step);
    }

    ParseReport {
        timeline: Timeline::new(steps),
        lines,
    }
}

/// Read a routine from disk and parse it.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_routine_file(path: &Path) -> Result<ParseReport> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_routine_report(&text))
}

fn parse_line(line: &str) -> (Step, Option<RuleKind>) {
    let cleaned = strip_list_marker(line);
    let hint = find_duration(cleaned);
    let duration_secs = hint
        .as_ref()
        .map(|h| h.duration_secs)
        .unwrap_or(DEFAULT_DURATION_SECS)
        .max(1);
    let name = derive_name(cleaned, hint.as_ref());
    (
        Step {
            name,
            duration_secs,
            source_line: cleaned.to_string(),
        },
        hint.map(|h| h.rule),
    )
}
