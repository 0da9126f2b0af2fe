//! Display utilities and output formatting for the barmill CLI.

use barmill_lib::{FileFormat, PipelineRun, StepStatus};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};

/// Output format for written tables.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
    Parquet,
}

impl Format {
    /// Returns the file format this choice selects.
    pub(crate) const fn file_format(self) -> FileFormat {
        match self {
            Self::Csv => FileFormat::Csv,
            Self::Json => FileFormat::Json,
            Self::Ndjson => FileFormat::Ndjson,
            Self::Parquet => FileFormat::Parquet,
        }
    }
}

/// Creates a progress bar over `len` steps, hidden in quiet mode.
pub(crate) fn step_progress(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} steps {msg}")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

/// Creates a spinner, hidden in quiet mode.
pub(crate) fn spinner(message: String, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb
}

/// Prints a human-readable summary of a pipeline run.
pub(crate) fn print_run(run: &PipelineRun) {
    println!("Run: {}", run.id);
    println!("Status: {}", run.status);
    println!("Storage: {}", run.storage_signature);

    if let Some(started) = run.started_at {
        println!("Started: {}", started.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(completed) = run.completed_at {
        println!("Completed: {}", completed.format("%Y-%m-%d %H:%M:%S"));
    }

    println!("\nSteps:");
    for step in &run.steps {
        let duration = step
            .duration_ms()
            .map_or_else(|| "-".to_string(), |ms| format!("{ms} ms"));
        println!(
            "  {}. {:<12} [{}] {}",
            step.index + 1,
            step.name,
            step.status,
            duration
        );
        match step.status {
            StepStatus::Completed => {
                if let Some(ref output) = step.output {
                    println!("     Output: {output}");
                }
            }
            StepStatus::Failed => {
                if let Some(ref err) = step.error_message {
                    println!("     Error: {err}");
                }
            }
            _ => {}
        }
    }
}
