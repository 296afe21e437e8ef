//! Exercise name derivation.

use std::sync::OnceLock;

use regex::Regex;

use super::rules::DurationHint;

/// Maximum length of a step name, in characters.
pub const MAX_NAME_CHARS: usize = 50;

/// A hint starting before this character column is treated as a prefix
/// (`30 sec wrist circles`); otherwise it is a suffix (`Plank - 1 min`).
pub const PREFIX_HINT_COLUMN: usize = 10;

/// Names shorter than this mean the hint swallowed the line.
const MIN_NAME_CHARS: usize = 3;

static PARENTHETICAL_REGEX: OnceLock<Regex> = OnceLock::new();

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ':' | '-' | '–' | '—' | ',' | ')')
}

/// Pick a display name for `line` given where its duration hint sits.
pub fn derive_name(line: &str, hint: Option<&DurationHint>) -> String {
    let candidate = hint.map(|hint| {
        let column = line[..hint.span.start].chars().count();
        if column < PREFIX_HINT_COLUMN {
            line[hint.span.end..].trim_start_matches(is_separator)
        } else {
            line[..hint.span.start].trim_end_matches(|c| is_separator(c) || c == '(')
        }
    });

    let name = match candidate {
        Some(name) if name.chars().count() >= MIN_NAME_CHARS => name.to_string(),
        _ => without_parentheticals(line),
    };

    truncate(&name, MAX_NAME_CHARS)
}

fn without_parentheticals(line: &str) -> String {
    let re = PARENTHETICAL_REGEX
        .get_or_init(|| Regex::new(r"\([^)]*\)").expect("Invalid parenthetical regex"));
    let stripped = re.replace_all(line, " ");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        line.trim().to_string()
    } else {
        collapsed
    }
}

fn truncate(name: &str, max_chars: usize) -> String {
    match name.char_indices().nth(max_chars) {
        Some((cut, _)) => name[..cut].trim_end().to_string(),
        None => name.to_string(),
    }
}
