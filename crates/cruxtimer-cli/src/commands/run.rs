use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use cruxtimer_core::timer::{format_clock, format_progress, SilentCues};
use cruxtimer_core::{
    Config, Cue, CueError, CueSink, Event, Phase, RunOutcome, Timeline, TimerCommand, TimerEngine,
    TimerObserver, TimerRunner, TimerSettings,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use super::{load_routine, EXIT_UNPARSEABLE};

#[derive(Args)]
pub struct RunArgs {
    /// Routine file (stdin carries the timer controls)
    pub file: PathBuf,
    /// Rest between exercises in seconds (overrides config)
    #[arg(long)]
    pub rest: Option<u32>,
    /// Stop after each exercise instead of resting and moving on
    #[arg(long)]
    pub manual: bool,
    /// Disable audio cues
    #[arg(long)]
    pub silent: bool,
    /// Start playing immediately
    #[arg(long)]
    pub autostart: bool,
}

const HELP: &str = "commands: p = play/pause, n = next, b = back, r = restart, q = quit";

/// Rings the terminal bell on stderr.
struct TerminalBell;

impl CueSink for TerminalBell {
    fn play(&self, cue: Cue) -> Result<(), CueError> {
        let rings = match cue {
            Cue::Countdown | Cue::StepEnd => 1,
            Cue::Complete => 3,
        };
        let mut err = std::io::stderr().lock();
        err.write_all("\x07".repeat(rings).as_bytes())?;
        err.flush()?;
        Ok(())
    }
}

/// Prints timer progress to stdout.
struct ConsoleView {
    timeline: Timeline,
    settings: TimerSettings,
}

impl ConsoleView {
    fn label(&self, phase: Phase, step_index: usize) -> String {
        let name = |i: usize| {
            self.timeline
                .get(i)
                .map(|s| s.name.as_str())
                .unwrap_or_default()
        };
        match phase {
            Phase::Resting => format!("Rest (next: {})", name(step_index + 1)),
            _ => name(step_index).to_string(),
        }
    }
}

impl TimerObserver for ConsoleView {
    fn on_event(&mut self, event: &Event) {
        let Event::Tick {
            remaining_secs,
            phase,
            step_index,
            elapsed_secs,
            ..
        } = *event
        else {
            return;
        };
        print!(
            "\r[{}/{}] {:<40} {:>6}  ({})",
            step_index + 1,
            self.timeline.len(),
            self.label(phase, step_index),
            format_clock(u64::from(remaining_secs)),
            format_progress(elapsed_secs, self.timeline.total_secs()),
        );
        let _ = std::io::stdout().flush();
    }

    fn on_phase_change(&mut self, _from: Phase, to: Phase, step_index: usize) {
        if to == Phase::Resting {
            println!();
            println!("Rest {}s", self.settings.rest_secs);
        } else if to == Phase::Exercising {
            println!();
        }
        debug!(?to, step_index, "phase changed");
    }

    fn on_step_change(&mut self, step_index: usize) {
        if let Some(step) = self.timeline.get(step_index) {
            println!();
            println!(
                "Step {}/{}: {} ({})",
                step_index + 1,
                self.timeline.len(),
                step.name,
                format_clock(u64::from(step.duration_secs))
            );
        }
    }

    fn on_complete(&mut self) {
        println!();
        println!(
            "Routine complete: {} steps, {}",
            self.timeline.len(),
            format_clock(self.timeline.total_secs())
        );
    }
}

fn parse_command(line: &str) -> Option<TimerCommand> {
    match line.trim().to_lowercase().as_str() {
        "p" | "play" | "pause" | "" => Some(TimerCommand::TogglePlay),
        "n" | "next" => Some(TimerCommand::SkipForward),
        "b" | "back" | "prev" => Some(TimerCommand::SkipBackward),
        "r" | "restart" => Some(TimerCommand::Restart),
        "q" | "quit" | "exit" => Some(TimerCommand::Close),
        _ => None,
    }
}

/// Forward stdin lines as commands. At end of input the sender is kept
/// alive so the timer can still run to completion.
async fn read_commands(tx: mpsc::Sender<TimerCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(command) = parse_command(&line) else {
                    eprintln!("unknown command {:?}; {HELP}", line.trim());
                    continue;
                };
                if tx.send(command).await.is_err() || command == TimerCommand::Close {
                    return;
                }
            }
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "stdin closed");
                break;
            }
        }
    }
    std::future::pending::<()>().await;
}

async fn drive(engine: TimerEngine, cues: Box<dyn CueSink>) -> RunOutcome {
    let (tx, rx) = mpsc::channel(16);
    let input = tokio::spawn(read_commands(tx));

    let view = ConsoleView {
        timeline: engine.timeline().clone(),
        settings: engine.settings(),
    };
    let first = engine.current_step();
    println!(
        "{} steps, {} total. {HELP}",
        engine.timeline().len(),
        format_clock(engine.total_secs())
    );
    println!(
        "Step 1/{}: {} ({})",
        engine.timeline().len(),
        first.name,
        format_clock(u64::from(first.duration_secs))
    );

    let mut runner = TimerRunner::new(engine, cues, view);
    let outcome = runner.run(rx).await;
    input.abort();
    outcome
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let report = load_routine(Some(&args.file))?;
    if report.timeline.is_empty() {
        eprintln!(
            "cannot display routine: no exercises found in {}",
            args.file.display()
        );
        std::process::exit(EXIT_UNPARSEABLE);
    }

    let mut settings = config.timer_settings();
    if let Some(rest) = args.rest {
        settings.rest_secs = rest;
    }
    if args.manual {
        settings.auto_advance = false;
    }

    let mut engine = TimerEngine::new(report.timeline, settings)?;
    if args.autostart || config.timer.autostart {
        engine.play();
    }

    let cues: Box<dyn CueSink> = if args.silent || !config.audio.enabled {
        Box::new(SilentCues)
    } else {
        Box::new(TerminalBell)
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let outcome = rt.block_on(drive(engine, cues));
    // stdin reads block a worker thread that would otherwise hold shutdown
    rt.shutdown_background();

    if outcome == RunOutcome::Closed {
        println!();
        println!("Timer closed");
    }
    Ok(())
}
