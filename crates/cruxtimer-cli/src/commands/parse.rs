use std::path::PathBuf;

use clap::Args;
use cruxtimer_core::routine::{LineOutcome, SkipReason};
use cruxtimer_core::timer::format_clock;

use super::{load_routine, EXIT_UNPARSEABLE};

#[derive(Args)]
pub struct ParseArgs {
    /// Routine file; reads stdin when omitted or "-"
    pub file: Option<PathBuf>,
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
    /// Show how every input line was handled
    #[arg(long)]
    pub explain: bool,
}

pub fn run(args: ParseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = load_routine(args.file.as_deref())?;

    if args.json {
        let json = if args.explain {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string_pretty(&report.timeline)?
        };
        println!("{json}");
    } else {
        for (i, step) in report.timeline.iter().enumerate() {
            println!(
                "{:>3}. {:<50} {:>6}",
                i + 1,
                step.name,
                format_clock(u64::from(step.duration_secs))
            );
        }
        if !report.timeline.is_empty() {
            println!(
                "{} steps, {} total",
                report.timeline.len(),
                format_clock(report.timeline.total_secs())
            );
        }
        if args.explain {
            for line in &report.lines {
                match line {
                    LineOutcome::Skipped { line_no, reason } => {
                        let why = match reason {
                            SkipReason::Blank => "blank",
                            SkipReason::Header => "section header",
                        };
                        eprintln!("line {line_no}: skipped ({why})");
                    }
                    LineOutcome::Parsed {
                        line_no,
                        step_index,
                        rule,
                    } => {
                        let how = rule
                            .map(|r| format!("{r:?} rule").to_lowercase())
                            .unwrap_or_else(|| "default duration".to_string());
                        eprintln!("line {line_no}: step {} via {how}", step_index + 1);
                    }
                }
            }
        }
    }

    if report.timeline.is_empty() {
        eprintln!("no exercises found in routine");
        std::process::exit(EXIT_UNPARSEABLE);
    }
    Ok(())
}
