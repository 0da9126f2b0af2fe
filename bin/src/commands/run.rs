//! Run command implementation.
//!
//! This module loads a pipeline definition and runs it against the built-in
//! tasks, with a local backend and an in-process memory backend.

use crate::display::{print_run, step_progress};
use anyhow::{Context, Result};
use barmill_lib::prelude::*;
use barmill_lib::{StepObserver, StepRecord};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Advances a progress bar as steps finish.
struct ProgressObserver<'a> {
    progress: &'a ProgressBar,
}

impl StepObserver for ProgressObserver<'_> {
    fn step_started(&mut self, step: &StepRecord) {
        self.progress.set_message(step.name.clone());
    }

    fn step_finished(&mut self, _step: &StepRecord) {
        self.progress.inc(1);
    }
}

/// Run the pipeline defined in `path`.
pub(crate) fn run_pipeline(
    path: &Path,
    root: Option<PathBuf>,
    output_json: bool,
    quiet: bool,
) -> Result<()> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open pipeline definition: {}", path.display()))?;
    let spec = PipelineSpec::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid pipeline definition: {}", path.display()))?;

    let local = root.map_or_else(LocalStorage::from_env, LocalStorage::new);
    tracing::debug!(root = %local.root().display(), "local storage root");
    let storages = StorageProvider::new()
        .with_backend(local)
        .with_backend(MemoryStorage::new());
    let registry = TaskRegistry::with_builtin_tasks(storages);

    let progress = step_progress(spec.tasks.len() as u64, quiet || output_json);
    let mut run = PipelineRun::new(&spec);
    let result = Pipeline::new(&registry).run_tracked(
        &spec,
        &mut run,
        &mut ProgressObserver {
            progress: &progress,
        },
    );
    progress.finish_and_clear();

    if output_json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else if !quiet {
        print_run(&run);
    }

    let output = result.context("Pipeline failed")?;
    if !quiet && !output_json {
        println!("\nResult: {output}");
    }

    Ok(())
}
