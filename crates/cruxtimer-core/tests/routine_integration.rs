//! Integration tests for routine parsing.

use cruxtimer_core::routine::{LineOutcome, RuleKind, SkipReason};
use cruxtimer_core::{parse_routine, parse_routine_report, TimerEngine, TimerSettings, ValidationError};

const GENERATED_WARMUP: &str = "\
Warmup
1. Jumping jacks (2 min)
2. 30 sec wrist circles
3) 1-2 min couch stretch each side
- 3 x shoulder rolls each side
• Random text with no duration

Cooldown:
* Cat-cow - 1 min
Notes
";

#[test]
fn test_generated_warmup_parses_in_order() {
    let timeline = parse_routine(GENERATED_WARMUP);
    let got: Vec<(&str, u32)> = timeline
        .iter()
        .map(|s| (s.name.as_str(), s.duration_secs))
        .collect();

    assert_eq!(
        got,
        vec![
            ("Jumping jacks", 120),
            ("wrist circles", 30),
            ("couch stretch each side", 90),
            ("shoulder rolls each side", 180),
            ("Random text with no duration", 60),
            ("Cat-cow", 60),
        ]
    );
    assert_eq!(timeline.total_secs(), 120 + 30 + 90 + 180 + 60 + 60);
}

#[test]
fn test_source_lines_drop_list_markers() {
    let timeline = parse_routine(GENERATED_WARMUP);
    assert_eq!(timeline.steps()[0].source_line, "Jumping jacks (2 min)");
    assert_eq!(timeline.steps()[2].source_line, "1-2 min couch stretch each side");
}

#[test]
fn test_report_names_matching_rules() {
    let report = parse_routine_report(GENERATED_WARMUP);
    let rules: Vec<Option<RuleKind>> = report
        .lines
        .iter()
        .filter_map(|l| match l {
            LineOutcome::Parsed { rule, .. } => Some(*rule),
            LineOutcome::Skipped { .. } => None,
        })
        .collect();
    assert_eq!(
        rules,
        vec![
            Some(RuleKind::Minutes),
            Some(RuleKind::Seconds),
            Some(RuleKind::Range),
            Some(RuleKind::Reps),
            None,
            Some(RuleKind::Minutes),
        ]
    );

    let headers = report
        .lines
        .iter()
        .filter(|l| {
            matches!(
                l,
                LineOutcome::Skipped {
                    reason: SkipReason::Header,
                    ..
                }
            )
        })
        .count();
    assert_eq!(headers, 3);
}

#[test]
fn test_header_only_routine_is_not_playable() {
    let timeline = parse_routine("Warmup\n\n");
    assert!(timeline.is_empty());
    let err = TimerEngine::new(timeline, TimerSettings::default()).unwrap_err();
    assert_eq!(err, ValidationError::EmptyTimeline);
}

#[test]
fn test_long_lines_are_truncated() {
    let line = format!("{} 45 sec", "Very slow eccentric campus board ladder ".repeat(3));
    let timeline = parse_routine(&line);
    assert_eq!(timeline.steps()[0].duration_secs, 45);
    assert!(timeline.steps()[0].name.chars().count() <= 50);
}

#[test]
fn test_timeline_serializes_to_json() {
    let timeline = parse_routine("Hangs 10s");
    let json = serde_json::to_value(&timeline).unwrap();
    assert_eq!(json["steps"][0]["duration_secs"], 10);
    assert_eq!(json["steps"][0]["source_line"], "Hangs 10s");
}

#[test]
fn test_dash_separators_versus_ranges() {
    let cases: &[(&str, &str, u32, RuleKind)] = &[
        ("Round 2 - 5 min easy climbing", "Round 2", 300, RuleKind::Minutes),
        ("Set 3 - 30 sec hang", "hang", 30, RuleKind::Seconds),
        ("Exercise 1 - 3 min jog", "Exercise 1", 180, RuleKind::Minutes),
        ("Round 2 – 4 min", "Round 2", 240, RuleKind::Minutes),
        ("Plank 20 - 40 sec", "Plank 20", 40, RuleKind::Seconds),
        ("2–3 min dead hangs", "dead hangs", 150, RuleKind::Range),
        ("20-40 sec plank", "plank", 30, RuleKind::Range),
        ("Campus ladder 1-2 min", "Campus ladder", 90, RuleKind::Range),
    ];

    for (line, name, secs, rule) in cases {
        let report = parse_routine_report(line);
        let step = &report.timeline.steps()[0];
        assert_eq!(step.name, *name, "name of {line:?}");
        assert_eq!(step.duration_secs, *secs, "duration of {line:?}");
        assert!(
            matches!(
                report.lines[0],
                LineOutcome::Parsed { rule: Some(r), .. } if r == *rule
            ),
            "rule of {line:?}: {:?}",
            report.lines[0]
        );
    }
}

#[test]
fn test_numbered_rounds_keep_their_durations() {
    let routine = "\
Exercises
1. Round 1 - 4 min easy traverse
2. Round 2 - 4 min harder traverse
3. Rest 2-3 min
";
    let timeline = parse_routine(routine);
    let got: Vec<(&str, u32)> = timeline
        .iter()
        .map(|s| (s.name.as_str(), s.duration_secs))
        .collect();
    assert_eq!(
        got,
        vec![("Round 1", 240), ("Round 2", 240), ("Rest 2-3 min", 150)]
    );
}
