//! Duration matcher rules.
//!
//! Each rule is a pure function from a cleaned line to an optional
//! [`DurationHint`]. Rules are evaluated in the fixed order of [`RULES`] and
//! the first match wins, so the ordering here is load-bearing:
//!
//! ```text
//! minutes -> seconds -> range -> reps -> (default 60s)
//! ```
//!
//! The simple minute and second rules refuse a number that is the upper bound
//! of a tight range (`1-2 min`), which leaves that text for the range rule. A
//! spaced dash (`Round 2 - 5 min`) is a separator, not a range.

use std::ops::Range;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Duration used when no rule matches a line.
pub const DEFAULT_DURATION_SECS: u32 = 60;

/// Seconds allotted to one repetition of a rep-based exercise.
pub const SECS_PER_REP: u32 = 30;

/// Identifies which rule produced a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Minutes,
    Seconds,
    Range,
    Reps,
}

/// A resolved duration plus where in the line it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationHint {
    pub rule: RuleKind,
    pub duration_secs: u32,
    /// Byte span of the hint within the cleaned line.
    pub span: Range<usize>,
}

/// A named matcher rule.
#[derive(Clone, Copy)]
pub struct DurationRule {
    pub kind: RuleKind,
    pub matcher: fn(&str) -> Option<DurationHint>,
}

/// All rules, in evaluation order.
pub const RULES: &[DurationRule] = &[
    DurationRule {
        kind: RuleKind::Minutes,
        matcher: match_minutes,
    },
    DurationRule {
        kind: RuleKind::Seconds,
        matcher: match_seconds,
    },
    DurationRule {
        kind: RuleKind::Range,
        matcher: match_range,
    },
    DurationRule {
        kind: RuleKind::Reps,
        matcher: match_reps,
    },
];

/// Run every rule in order and return the first hint found.
pub fn find_duration(line: &str) -> Option<DurationHint> {
    RULES.iter().find_map(|rule| (rule.matcher)(line))
}

static MINUTES_REGEX: OnceLock<Regex> = OnceLock::new();
static SECONDS_REGEX: OnceLock<Regex> = OnceLock::new();
static RANGE_REGEX: OnceLock<Regex> = OnceLock::new();
static REPS_REGEX: OnceLock<Regex> = OnceLock::new();

/// `<N> min`, `<N>m`, `(<N> minutes)`.
pub fn match_minutes(line: &str) -> Option<DurationHint> {
    let re = MINUTES_REGEX.get_or_init(|| {
        Regex::new(r"(?i)(?:\(\s*)?(\d+)\s*(minutes|minute|mins|min|m)(?:\s*\))?")
            .expect("Invalid minutes regex")
    });
    re.captures_iter(line).find_map(|caps| {
        let number = caps.get(1)?;
        if !unit_is_terminated(line, &caps, 2) || is_range_upper_bound(line, number.start()) {
            return None;
        }
        let minutes: u64 = number.as_str().parse().ok()?;
        Some(hint(RuleKind::Minutes, minutes.saturating_mul(60), &caps))
    })
}

/// `<N> sec`, `<N>s`, `(<N> seconds)`.
pub fn match_seconds(line: &str) -> Option<DurationHint> {
    let re = SECONDS_REGEX.get_or_init(|| {
        Regex::new(r"(?i)(?:\(\s*)?(\d+)\s*(seconds|second|secs|sec|s)(?:\s*\))?")
            .expect("Invalid seconds regex")
    });
    re.captures_iter(line).find_map(|caps| {
        let number = caps.get(1)?;
        if !unit_is_terminated(line, &caps, 2) || is_range_upper_bound(line, number.start()) {
            return None;
        }
        let secs: u64 = number.as_str().parse().ok()?;
        Some(hint(RuleKind::Seconds, secs, &caps))
    })
}

/// `<A>-<B> min` resolves to the rounded average in seconds, so `1-2 min` is
/// 90 seconds. `<A>-<B> sec` is accepted as well. The dash must touch both
/// numbers.
pub fn match_range(line: &str) -> Option<DurationHint> {
    let re = RANGE_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)(?:\(\s*)?(\d+)[-–—](\d+)\s*(minutes|minute|mins|min|m|seconds|second|secs|sec|s)(?:\s*\))?",
        )
        .expect("Invalid range regex")
    });
    re.captures_iter(line).find_map(|caps| {
        if !unit_is_terminated(line, &caps, 3) {
            return None;
        }
        let low: u64 = caps.get(1)?.as_str().parse().ok()?;
        let high: u64 = caps.get(2)?.as_str().parse().ok()?;
        let unit = caps.get(3)?.as_str();
        let scale = if unit.starts_with(['m', 'M']) { 60 } else { 1 };
        // round-half-up of (low + high) / 2 * scale
        let doubled = low.saturating_add(high).saturating_mul(scale);
        Some(hint(RuleKind::Range, doubled.saturating_add(1) / 2, &caps))
    })
}

/// `<N> x` (or `×`). Doubled when the line mentions "each side".
pub fn match_reps(line: &str) -> Option<DurationHint> {
    let re = REPS_REGEX
        .get_or_init(|| Regex::new(r"(?i)(\d+)\s*(x|×)").expect("Invalid reps regex"));
    re.captures_iter(line).find_map(|caps| {
        if !unit_is_terminated(line, &caps, 2) {
            return None;
        }
        let reps: u64 = caps.get(1)?.as_str().parse().ok()?;
        let mut secs = reps.saturating_mul(u64::from(SECS_PER_REP));
        if line.to_lowercase().contains("each side") {
            secs = secs.saturating_mul(2);
        }
        Some(hint(RuleKind::Reps, secs, &caps))
    })
}

fn hint(rule: RuleKind, secs: u64, caps: &Captures<'_>) -> DurationHint {
    let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
    DurationHint {
        rule,
        duration_secs: u32::try_from(secs).unwrap_or(u32::MAX),
        span: whole,
    }
}

/// The unit must not run straight into another letter (`5 mountain` is not
/// five minutes).
fn unit_is_terminated(line: &str, caps: &Captures<'_>, unit_group: usize) -> bool {
    let Some(unit) = caps.get(unit_group) else {
        return false;
    };
    !line[unit.end()..]
        .chars()
        .next()
        .is_some_and(char::is_alphabetic)
}

/// True when the number starting at `start` directly follows `<digit>-`.
fn is_range_upper_bound(line: &str, start: usize) -> bool {
    match line[..start].strip_suffix(['-', '–', '—']) {
        Some(rest) => rest.ends_with(|c: char| c.is_ascii_digit()),
        None => false,
    }
}
