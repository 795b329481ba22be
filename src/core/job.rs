use std::time::Duration;

use chrono::{DateTime, Local};

pub type JobId = u64;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);
pub const MAX_TIMEOUT: Duration = Duration::from_secs(86_400);

/// `Pending` is reserved; submission always starts a job in `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    #[allow(dead_code)]
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::Running => "Running",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
        }
    }
}

/// Result attached to a job once it reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Cracked { password: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub file_name: String,
    pub status: JobStatus,
    pub start_time: DateTime<Local>,
    pub end_time: Option<DateTime<Local>>,
    /// Percentage in `[0, 100]`.
    pub progress: f64,
    pub outcome: Option<JobOutcome>,
    pub wordlist_url: Option<String>,
    pub timeout: Duration,
}

impl Job {
    pub fn password(&self) -> Option<&str> {
        match &self.outcome {
            Some(JobOutcome::Cracked { password }) => Some(password),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Some(JobOutcome::Failed { error }) => Some(error),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// Fields collected by the submission form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub file_name: String,
    pub wordlist_url: Option<String>,
    pub timeout: Duration,
}

impl SubmitRequest {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            wordlist_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
