//! Line filtering and list-marker stripping.

use std::sync::OnceLock;

use regex::Regex;

/// Lines consisting solely of one of these words are layout, not exercises.
const SECTION_HEADERS: &[&str] = &[
    "warmup",
    "warm-up",
    "warm up",
    "cooldown",
    "cool-down",
    "cool down",
    "exercises",
    "notes",
];

static LIST_MARKER_REGEX: OnceLock<Regex> = OnceLock::new();

/// True for a bare section header such as `Warmup`, `## Cooldown:` or `**Notes**`.
pub fn is_section_header(line: &str) -> bool {
    let word = line
        .trim()
        .trim_matches(|c: char| matches!(c, '#' | '*' | '_') || c.is_whitespace())
        .trim_end_matches(':')
        .trim();
    let word = word.to_lowercase();
    SECTION_HEADERS.contains(&word.as_str())
}

/// Strip one leading enumeration (`12. `, `3) `) or bullet (`- `, `• `, `* `).
pub fn strip_list_marker(line: &str) -> &str {
    let re = LIST_MARKER_REGEX.get_or_init(|| {
        Regex::new(r"^(?:\d+[.)]|[-•*])\s+").expect("Invalid list marker regex")
    });
    let line = line.trim();
    match re.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_case_insensitive() {
        assert!(is_section_header("Warmup"));
        assert!(is_section_header("  COOLDOWN  "));
        assert!(is_section_header("## Exercises:"));
        assert!(is_section_header("**Notes**"));
        assert!(is_section_header("Warm-up:"));
    }

    #[test]
    fn header_words_inside_a_sentence_are_kept() {
        assert!(!is_section_header("Warmup jog 5 min"));
        assert!(!is_section_header("Notes: breathe"));
    }

    #[test]
    fn strips_enumeration_and_bullets() {
        assert_eq!(strip_list_marker("12. Hangs 10s"), "Hangs 10s");
        assert_eq!(strip_list_marker("3) Hangs"), "Hangs");
        assert_eq!(strip_list_marker("- Hangs"), "Hangs");
        assert_eq!(strip_list_marker("• Hangs"), "Hangs");
        assert_eq!(strip_list_marker("  * Hangs"), "Hangs");
    }

    #[test]
    fn leaves_unmarked_lines_alone() {
        assert_eq!(strip_list_marker("30 sec wrist circles"), "30 sec wrist circles");
        assert_eq!(strip_list_marker("-5 min jog"), "-5 min jog");
    }
}
