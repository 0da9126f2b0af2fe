//! Sequential pipeline execution.

use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span};

use crate::{
    Params, PipelineError, PipelineRun, StepRecord, TaskArgs, TaskOutput, TaskRegistry,
};

/// One step of a pipeline: a registered task name and its own arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// The registered task name.
    pub name: String,
    /// The step's own arguments.
    #[serde(default)]
    pub args: Params,
}

impl TaskDescriptor {
    /// Creates a descriptor with no arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), args: Params::new() }
    }

    /// Adds an argument.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

/// A pipeline definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Storage signature injected into every step.
    #[serde(alias = "fs_signature")]
    pub storage_signature: String,
    /// Steps in execution order.
    pub tasks: Vec<TaskDescriptor>,
}

impl PipelineSpec {
    /// Creates a pipeline definition.
    #[must_use]
    pub fn new(storage_signature: impl Into<String>, tasks: Vec<TaskDescriptor>) -> Self {
        Self { storage_signature: storage_signature.into(), tasks }
    }

    /// Parses a JSON pipeline definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid pipeline definition.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Reads a JSON pipeline definition.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the document is invalid.
    pub fn from_reader<R: Read>(reader: R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }
}

/// Receives step lifecycle notifications during a run.
pub trait StepObserver {
    /// Called before a step's task is resolved.
    fn step_started(&mut self, _step: &StepRecord) {}

    /// Called after a step completes or fails.
    fn step_finished(&mut self, _step: &StepRecord) {}
}

impl StepObserver for () {}

/// Runs pipeline definitions against a task registry.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'r> {
    registry: &'r TaskRegistry,
}

impl<'r> Pipeline<'r> {
    /// Creates a runner resolving tasks through `registry`.
    #[must_use]
    pub const fn new(registry: &'r TaskRegistry) -> Self {
        Self { registry }
    }

    /// Runs every step in order and returns the last step's output.
    ///
    /// # Errors
    ///
    /// Returns the first step failure, tagged with its index and name.
    pub fn run(&self, spec: &PipelineSpec) -> Result<TaskOutput, PipelineError> {
        let mut run = PipelineRun::new(spec);
        self.run_tracked(spec, &mut run, &mut ())
    }

    /// Runs every step in order, updating `run` and notifying `observer`.
    ///
    /// A table produced by one step is passed to the next as `df`. Any other
    /// output is not threaded forward but is still returned if it comes from
    /// the last step. An empty pipeline returns [`TaskOutput::Empty`].
    ///
    /// # Errors
    ///
    /// Returns the first step failure, tagged with its index and name. Later
    /// steps are marked skipped in `run`.
    pub fn run_tracked(
        &self,
        spec: &PipelineSpec,
        run: &mut PipelineRun,
        observer: &mut dyn StepObserver,
    ) -> Result<TaskOutput, PipelineError> {
        let span = info_span!("pipeline", run_id = %run.id);
        let _guard = span.enter();

        info!(steps = spec.tasks.len(), storage = %spec.storage_signature, "starting pipeline");
        run.mark_started();

        let mut carried = TaskOutput::Empty;
        for (index, descriptor) in spec.tasks.iter().enumerate() {
            let mut args = TaskArgs::new(descriptor.args.clone())
                .with_storage_signature(spec.storage_signature.as_str());
            if let TaskOutput::Frame(frame) = std::mem::take(&mut carried) {
                args = args.with_df(frame);
            }

            run.steps[index].mark_running();
            observer.step_started(&run.steps[index]);
            debug!(step = index, task = %descriptor.name, "running step");

            match self.run_step(index, &descriptor.name, args) {
                Ok(output) => {
                    run.steps[index].mark_completed(output.to_string());
                    observer.step_finished(&run.steps[index]);
                    info!(
                        step = index,
                        task = %descriptor.name,
                        output = %output,
                        "step completed"
                    );
                    carried = output;
                }
                Err(err) => {
                    run.steps[index].mark_failed(err.to_string());
                    run.mark_failed();
                    observer.step_finished(&run.steps[index]);
                    error!(step = index, task = %descriptor.name, error = %err, "step failed");
                    return Err(err);
                }
            }
        }

        run.mark_completed();
        info!(steps = spec.tasks.len(), "pipeline completed");
        Ok(carried)
    }

    fn run_step(
        &self,
        index: usize,
        name: &str,
        args: TaskArgs,
    ) -> Result<TaskOutput, PipelineError> {
        let mut task = self.registry.get_task(name, args.params()).map_err(|source| {
            PipelineError::Resolve { index, name: name.to_string(), source }
        })?;
        task.execute(args)
            .map_err(|source| PipelineError::Execute { index, name: name.to_string(), source })
    }
}
