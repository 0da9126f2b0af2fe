//! Run and step status records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::PipelineSpec;

/// Unique identifier for a pipeline run.
pub type RunId = Uuid;

/// Status of a run or of one of its steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Not yet started.
    #[default]
    Pending,
    /// Currently executing.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
    /// Not run because an earlier step failed.
    Skipped,
}

impl StepStatus {
    /// Returns true if the status is terminal.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Skipped)
    }

    /// Returns the status as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The record of one step within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// Zero-based position in the pipeline.
    pub index: usize,
    /// The task name.
    pub name: String,
    /// Current status.
    pub status: StepStatus,
    /// When the step started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the step finished.
    pub completed_at: Option<DateTime<Utc>>,
    /// Summary of the step's output.
    pub output: Option<String>,
    /// Error message if the step failed.
    pub error_message: Option<String>,
}

impl StepRecord {
    /// Creates a pending step record.
    #[must_use]
    pub const fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            status: StepStatus::Pending,
            started_at: None,
            completed_at: None,
            output: None,
            error_message: None,
        }
    }

    /// Returns the elapsed time in milliseconds, once the step has finished.
    #[must_use]
    pub fn duration_ms(&self) -> Option<i64> {
        Some((self.completed_at? - self.started_at?).num_milliseconds())
    }

    pub(crate) fn mark_running(&mut self) {
        self.status = StepStatus::Running;
        self.started_at = Some(Utc::now());
    }

    pub(crate) fn mark_completed(&mut self, output: String) {
        self.status = StepStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.output = Some(output);
    }

    pub(crate) fn mark_failed(&mut self, error: String) {
        self.status = StepStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error_message = Some(error);
    }
}

/// The record of a complete pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Unique identifier for this run.
    pub id: RunId,
    /// The storage signature shared by every step.
    pub storage_signature: String,
    /// When the run record was created.
    pub created_at: DateTime<Utc>,
    /// When the first step started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the run finished.
    pub completed_at: Option<DateTime<Utc>>,
    /// Overall status.
    pub status: StepStatus,
    /// One record per step, in pipeline order.
    pub steps: Vec<StepRecord>,
}

impl PipelineRun {
    /// Creates a pending run record for `spec`.
    #[must_use]
    pub fn new(spec: &PipelineSpec) -> Self {
        let steps = spec
            .tasks
            .iter()
            .enumerate()
            .map(|(index, task)| StepRecord::new(index, task.name.clone()))
            .collect();
        Self {
            id: Uuid::new_v4(),
            storage_signature: spec.storage_signature.clone(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            status: StepStatus::Pending,
            steps,
        }
    }

    /// Returns true if the run is in a terminal state.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Returns the number of completed steps.
    #[must_use]
    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.status == StepStatus::Completed).count()
    }

    /// Returns the failed step, if any.
    #[must_use]
    pub fn failed_step(&self) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.status == StepStatus::Failed)
    }

    pub(crate) fn mark_started(&mut self) {
        self.status = StepStatus::Running;
        self.started_at = Some(Utc::now());
    }

    pub(crate) fn mark_completed(&mut self) {
        self.status = StepStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub(crate) fn mark_failed(&mut self) {
        self.status = StepStatus::Failed;
        self.completed_at = Some(Utc::now());

        for step in &mut self.steps {
            if step.status == StepStatus::Pending {
                step.status = StepStatus::Skipped;
            }
        }
    }
}
