//! Display helpers.

/// `m:ss`, or `h:mm:ss` from an hour up.
pub fn format_clock(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// `elapsed / total`, both as clocks.
pub fn format_progress(elapsed_secs: u64, total_secs: u64) -> String {
    format!("{} / {}", format_clock(elapsed_secs), format_clock(total_secs))
}
