//! Colored console progress for pipeline runs.

use colored::Colorize;

use jspipe_core::{PipelineError, PipelineEvent, Reporter, RunSummary, Stage};

/// Prints one colored line per stage transition to stdout, errors to stderr.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print the trailing summary line after a successful run.
    pub fn summary(&self, summary: &RunSummary) {
        if self.quiet {
            return;
        }

        let stages = if summary.stages.is_empty() {
            "no transforms".to_string()
        } else {
            summary
                .stages
                .iter()
                .map(Stage::to_string)
                .collect::<Vec<_>>()
                .join(" -> ")
        };
        println!(
            "{}",
            format!(
                "({}, {} -> {} bytes, {} ms)",
                stages,
                summary.input_bytes,
                summary.output_bytes,
                summary.duration.as_millis()
            )
            .dimmed()
        );
    }

    /// Print a failed run. Always shown, even in quiet mode.
    pub fn error(&self, err: &PipelineError) {
        eprintln!("{}", "Error during optimization:".red().bold());
        eprintln!("{}", err);
    }
}

fn render(event: &PipelineEvent<'_>) -> (Stage, String) {
    match *event {
        PipelineEvent::Started { stage, path } => {
            let line = match (stage, path) {
                (Stage::Read | Stage::Write, Some(path)) => {
                    format!("{}: {}", stage.started_message(), path.display())
                }
                _ => stage.started_message().to_string(),
            };
            (stage, line)
        }
        PipelineEvent::Completed { stage, bytes, path } => {
            let line = match (stage, path) {
                (Stage::Write, Some(path)) => {
                    format!("{}. Output: {}", stage.completed_message(), path.display())
                }
                (Stage::Read, _) => format!("{} ({} bytes)", stage.completed_message(), bytes),
                _ => stage.completed_message().to_string(),
            };
            (stage, line)
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &PipelineEvent<'_>) {
        if self.quiet {
            return;
        }
        let (stage, line) = render(event);
        println!("{}", line.color(stage.color()));
    }
}
