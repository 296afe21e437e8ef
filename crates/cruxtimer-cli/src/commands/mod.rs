pub mod config;
pub mod parse;
pub mod run;

use std::io::Read;
use std::path::Path;

use cruxtimer_core::{parse_routine_report, read_routine_file, ParseReport};

/// Exit code for a routine with nothing playable in it.
pub const EXIT_UNPARSEABLE: i32 = 2;

/// Parse `path`, or stdin when it is `None` or `-`.
pub fn load_routine(path: Option<&Path>) -> Result<ParseReport, Box<dyn std::error::Error>> {
    match path {
        Some(path) if path != Path::new("-") => Ok(read_routine_file(path)?),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(parse_routine_report(&text))
        }
    }
}
