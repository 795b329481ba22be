use chrono::{DateTime, Local, TimeDelta};

use crate::core::job::{Job, JobOutcome, JobStatus, DEFAULT_TIMEOUT};

/// Sample jobs shown by `--demo`, newest first.
pub fn demo_jobs(now: DateTime<Local>) -> Vec<Job> {
    vec![
        Job {
            id: 1,
            file_name: "document.pdf".to_string(),
            status: JobStatus::Running,
            start_time: now - TimeDelta::minutes(5),
            end_time: None,
            progress: 45.0,
            outcome: None,
            wordlist_url: None,
            timeout: DEFAULT_TIMEOUT,
        },
        Job {
            id: 2,
            file_name: "archive.zip".to_string(),
            status: JobStatus::Completed,
            start_time: now - TimeDelta::minutes(20),
            end_time: Some(now - TimeDelta::minutes(10)),
            progress: 100.0,
            outcome: Some(JobOutcome::Cracked {
                password: "secret123".to_string(),
            }),
            wordlist_url: None,
            timeout: DEFAULT_TIMEOUT,
        },
        Job {
            id: 3,
            file_name: "presentation.pptx".to_string(),
            status: JobStatus::Failed,
            start_time: now - TimeDelta::minutes(1),
            end_time: Some(now - TimeDelta::seconds(30)),
            progress: 100.0,
            outcome: Some(JobOutcome::Failed {
                error: "Wordlist exhausted".to_string(),
            }),
            wordlist_url: None,
            timeout: DEFAULT_TIMEOUT,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stats::Stats;

    #[test]
    fn demo_jobs_satisfy_job_invariants() {
        let jobs = demo_jobs(Local::now());
        for job in &jobs {
            if job.status.is_terminal() {
                assert!(job.password().is_some() != job.error().is_some());
                assert!(job.end_time.unwrap() >= job.start_time);
            } else {
                assert!(job.outcome.is_none());
            }
        }

        let stats = Stats::from_jobs(&jobs);
        assert_eq!(stats.total_jobs, 3);
        assert_eq!(stats.running_jobs, 1);
        assert_eq!(stats.completed_jobs, 1);
        assert_eq!(stats.failed_jobs, 1);
    }
}
