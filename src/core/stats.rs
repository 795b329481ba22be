use crate::core::job::{Job, JobStatus};

/// Aggregate counters kept in step with the job list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_jobs: u64,
    pub running_jobs: u64,
    pub completed_jobs: u64,
    pub failed_jobs: u64,
}

impl Stats {
    pub fn from_jobs<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> Self {
        let mut stats = Stats::default();
        for job in jobs {
            stats.total_jobs += 1;
            match job.status {
                JobStatus::Pending => {}
                JobStatus::Running => stats.running_jobs += 1,
                JobStatus::Completed => stats.completed_jobs += 1,
                JobStatus::Failed => stats.failed_jobs += 1,
            }
        }
        stats
    }

    pub(crate) fn record_submitted(&mut self) {
        self.total_jobs += 1;
        self.running_jobs += 1;
    }

    pub(crate) fn record_resolved(&mut self, status: JobStatus) {
        self.running_jobs = self.running_jobs.saturating_sub(1);
        match status {
            JobStatus::Completed => self.completed_jobs += 1,
            JobStatus::Failed => self.failed_jobs += 1,
            JobStatus::Pending | JobStatus::Running => {}
        }
    }

    pub fn accounted(&self) -> u64 {
        self.running_jobs + self.completed_jobs + self.failed_jobs
    }
}
