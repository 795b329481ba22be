//! In-memory job list and its derived counters.
//!
//! The store is the only owner of job state. It is mutated from one thread:
//! by `submit` when the user sends the form, and by `tick` when the
//! scheduled timer fires.

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::core::job::{Job, JobId, JobOutcome, JobStatus, SubmitRequest};
use crate::core::random::RandomSource;
use crate::core::stats::Stats;

pub const MAX_PROGRESS: f64 = 100.0;
pub const MAX_INCREMENT: f64 = 5.0;
/// Draws at or below this value fail; 70% of jobs succeed.
pub const FAILURE_THRESHOLD: f64 = 0.3;
pub const PLACEHOLDER_PASSWORD: &str = "found_password";
pub const PLACEHOLDER_ERROR: &str = "Cracking failed";

/// What a single tick changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub advanced: Vec<JobId>,
    pub resolved: Vec<(JobId, JobStatus)>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.advanced.is_empty() && self.resolved.is_empty()
    }
}

pub struct JobStore {
    jobs: Vec<Job>,
    stats: Stats,
    next_id: JobId,
    rng: Box<dyn RandomSource>,
}

impl std::fmt::Debug for JobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobStore")
            .field("jobs", &self.jobs)
            .field("stats", &self.stats)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl JobStore {
    pub fn new(rng: Box<dyn RandomSource>) -> Self {
        Self::with_jobs(Vec::new(), rng)
    }

    /// Seeds the store with an existing list, newest first. Counters are
    /// recounted from the list and ids continue after the largest one.
    pub fn with_jobs(jobs: Vec<Job>, rng: Box<dyn RandomSource>) -> Self {
        let stats = Stats::from_jobs(&jobs);
        let next_id = jobs.iter().map(|job| job.id).max().unwrap_or(0) + 1;
        Self {
            jobs,
            stats,
            next_id,
            rng,
        }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    /// Jobs still `Pending` or `Running`, newest first.
    pub fn active(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|job| job.is_active())
    }

    /// Jobs in a terminal state, newest first.
    pub fn finished(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|job| !job.is_active())
    }

    /// Returns `None` without touching any state when the file name is blank.
    pub fn submit(&mut self, request: SubmitRequest) -> Option<JobId> {
        self.submit_at(request, Local::now())
    }

    pub fn submit_at(&mut self, request: SubmitRequest, now: DateTime<Local>) -> Option<JobId> {
        let file_name = request.file_name.trim();
        if file_name.is_empty() {
            debug!("ignoring submission with empty file name");
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;

        let job = Job {
            id,
            file_name: file_name.to_string(),
            status: JobStatus::Running,
            start_time: now,
            end_time: None,
            progress: 0.0,
            outcome: None,
            wordlist_url: request.wordlist_url,
            timeout: request.timeout,
        };
        info!(job_id = id, file_name = %job.file_name, "job submitted");

        self.jobs.insert(0, job);
        self.stats.record_submitted();
        Some(id)
    }

    pub fn tick(&mut self) -> TickReport {
        self.tick_at(Local::now())
    }

    pub fn tick_at(&mut self, now: DateTime<Local>) -> TickReport {
        let mut report = TickReport::default();

        for job in &mut self.jobs {
            if job.status != JobStatus::Running || job.progress >= MAX_PROGRESS {
                continue;
            }

            let increment = self.rng.next_unit() * MAX_INCREMENT;
            job.progress = (job.progress + increment).min(MAX_PROGRESS);
            report.advanced.push(job.id);

            if job.progress < MAX_PROGRESS {
                continue;
            }

            let succeeded = self.rng.next_unit() > FAILURE_THRESHOLD;
            job.end_time = Some(now.max(job.start_time));
            if succeeded {
                job.status = JobStatus::Completed;
                job.outcome = Some(JobOutcome::Cracked {
                    password: PLACEHOLDER_PASSWORD.to_string(),
                });
            } else {
                job.status = JobStatus::Failed;
                job.outcome = Some(JobOutcome::Failed {
                    error: PLACEHOLDER_ERROR.to_string(),
                });
            }
            self.stats.record_resolved(job.status);
            info!(
                job_id = job.id,
                file_name = %job.file_name,
                status = job.status.label(),
                "job resolved"
            );
            report.resolved.push((job.id, job.status));
        }

        debug_assert!(self.stats.accounted() <= self.stats.total_jobs);
        if !report.is_empty() {
            debug!(
                advanced = report.advanced.len(),
                resolved = report.resolved.len(),
                "tick applied"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use chrono::TimeDelta;

    use super::*;
    use crate::core::random::scripted::ScriptedRandom;

    fn store_with(rng: ScriptedRandom) -> JobStore {
        JobStore::new(Box::new(rng))
    }

    fn running_job(id: JobId, progress: f64) -> Job {
        Job {
            id,
            file_name: format!("file-{id}.zip"),
            status: JobStatus::Running,
            start_time: Local::now() - TimeDelta::minutes(5),
            end_time: None,
            progress,
            outcome: None,
            wordlist_url: None,
            timeout: Duration::from_secs(3600),
        }
    }

    fn tick_until_terminal(store: &mut JobStore, id: JobId) {
        for _ in 0..1_000 {
            if store.get(id).is_some_and(|job| job.status.is_terminal()) {
                return;
            }
            store.tick();
        }
        panic!("job {id} never reached a terminal state");
    }

    #[test]
    fn submit_prepends_running_job_and_counts_it() {
        let mut store = store_with(ScriptedRandom::constant(0.5));
        let first = store.submit(SubmitRequest::new("first.zip")).unwrap();
        let second = store.submit(SubmitRequest::new("a.txt")).unwrap();

        assert_eq!((first, second), (1, 2));
        let newest = &store.jobs()[0];
        assert_eq!(newest.file_name, "a.txt");
        assert_eq!(newest.status, JobStatus::Running);
        assert_eq!(newest.progress, 0.0);
        assert!(newest.end_time.is_none());
        assert!(newest.outcome.is_none());

        let stats = store.stats();
        assert_eq!(stats.total_jobs, 2);
        assert_eq!(stats.running_jobs, 2);
    }

    #[test]
    fn empty_file_name_changes_nothing() {
        let mut store = store_with(ScriptedRandom::constant(0.5));
        store.submit(SubmitRequest::new("keep.zip"));
        let before_jobs = store.jobs().to_vec();
        let before_stats = store.stats();

        assert_eq!(store.submit(SubmitRequest::new("")), None);
        assert_eq!(store.submit(SubmitRequest::new("   ")), None);

        assert_eq!(store.jobs(), before_jobs.as_slice());
        assert_eq!(store.stats(), before_stats);
        assert_eq!(store.submit(SubmitRequest::new("next.zip")), Some(2));
    }

    #[test]
    fn tick_advances_by_scaled_draw() {
        let mut store = store_with(ScriptedRandom::new([0.5, 0.2], 0.0));
        let id = store.submit(SubmitRequest::new("a.txt")).unwrap();

        let report = store.tick();
        assert_eq!(report.advanced, vec![id]);
        assert!(report.resolved.is_empty());
        assert_eq!(store.get(id).unwrap().progress, 2.5);

        store.tick();
        assert_eq!(store.get(id).unwrap().progress, 3.5);
    }

    #[test]
    fn progress_never_decreases_while_running() {
        let mut store = store_with(ScriptedRandom::new(
            [0.9, 0.0, 0.3, 0.7, 0.1, 0.0, 0.99, 0.42],
            0.25,
        ));
        let id = store.submit(SubmitRequest::new("a.txt")).unwrap();

        let mut last = 0.0;
        while store.get(id).unwrap().status == JobStatus::Running {
            store.tick();
            let progress = store.get(id).unwrap().progress;
            assert!(progress >= last);
            assert!(progress <= MAX_PROGRESS);
            last = progress;
        }
    }

    #[test]
    fn successful_resolution_sets_password_and_counters() {
        let mut store = store_with(ScriptedRandom::constant(0.99));
        let id = store.submit(SubmitRequest::new("a.txt")).unwrap();

        tick_until_terminal(&mut store, id);

        let job = store.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, MAX_PROGRESS);
        assert_eq!(job.password(), Some(PLACEHOLDER_PASSWORD));
        assert_eq!(job.error(), None);
        let end_time = job.end_time.expect("end time set on resolution");
        assert!(end_time >= job.start_time);

        let stats = store.stats();
        assert_eq!(stats.running_jobs, 0);
        assert_eq!(stats.completed_jobs, 1);
        assert_eq!(stats.failed_jobs, 0);
    }

    #[test]
    fn failed_resolution_sets_error_and_counters() {
        let rng = ScriptedRandom::new([0.5, 0.1], 0.0);
        let mut store = JobStore::with_jobs(vec![running_job(7, 98.0)], Box::new(rng));
        assert_eq!(store.stats().running_jobs, 1);

        let report = store.tick();
        assert_eq!(report.resolved, vec![(7, JobStatus::Failed)]);

        let job = store.get(7).unwrap();
        assert_matches!(
            &job.outcome,
            Some(JobOutcome::Failed { error }) if error == PLACEHOLDER_ERROR
        );
        assert!(job.end_time.is_some());
        assert_eq!(store.stats().running_jobs, 0);
        assert_eq!(store.stats().failed_jobs, 1);
    }

    #[test]
    fn end_time_never_precedes_start_when_clock_steps_back() {
        let job = running_job(9, 99.0);
        let start = job.start_time;
        let rng = ScriptedRandom::new([0.9, 0.9], 0.0);
        let mut store = JobStore::with_jobs(vec![job], Box::new(rng));

        store.tick_at(start - TimeDelta::minutes(3));

        let job = store.get(9).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.end_time, Some(start));
    }

    #[test]
    fn threshold_draw_counts_as_failure() {
        let rng = ScriptedRandom::new([1.0 / MAX_INCREMENT, FAILURE_THRESHOLD], 0.0);
        let mut store = JobStore::with_jobs(vec![running_job(1, 99.0)], Box::new(rng));

        store.tick();
        assert_eq!(store.get(1).unwrap().status, JobStatus::Failed);
    }

    #[test]
    fn terminal_jobs_are_sticky() {
        let mut store = store_with(ScriptedRandom::constant(0.99));
        let id = store.submit(SubmitRequest::new("a.txt")).unwrap();
        tick_until_terminal(&mut store, id);

        let frozen = store.get(id).unwrap().clone();
        let stats = store.stats();
        for _ in 0..10 {
            let report = store.tick();
            assert!(report.is_empty());
        }
        assert_eq!(store.get(id).unwrap(), &frozen);
        assert_eq!(store.stats(), stats);
    }

    #[test]
    fn tick_on_terminal_only_list_is_a_no_op() {
        let mut done = running_job(1, 100.0);
        done.status = JobStatus::Completed;
        done.end_time = Some(Local::now());
        done.outcome = Some(JobOutcome::Cracked {
            password: "secret123".to_string(),
        });
        let mut failed = running_job(2, 40.0);
        failed.status = JobStatus::Failed;
        failed.end_time = Some(Local::now());
        failed.outcome = Some(JobOutcome::Failed {
            error: "Wordlist exhausted".to_string(),
        });

        let mut store =
            JobStore::with_jobs(vec![failed, done], Box::new(ScriptedRandom::constant(0.9)));
        let jobs = store.jobs().to_vec();
        let stats = store.stats();

        assert!(store.tick().is_empty());
        assert_eq!(store.jobs(), jobs.as_slice());
        assert_eq!(store.stats(), stats);
    }

    #[test]
    fn counters_match_recount_across_many_ticks() {
        let mut store = store_with(ScriptedRandom::new(
            (0..500).map(|i| (i % 10) as f64 / 10.0),
            0.8,
        ));
        for name in ["a.txt", "b.zip", "c.pdf", "d.docx"] {
            store.submit(SubmitRequest::new(name));
        }

        for _ in 0..200 {
            store.tick();
            let stats = store.stats();
            assert_eq!(stats, Stats::from_jobs(store.jobs()));
            assert!(stats.accounted() <= stats.total_jobs);
            assert_eq!(stats.accounted(), stats.total_jobs);
            for job in store.finished() {
                assert!(job.password().is_some() != job.error().is_some());
            }
        }
        assert_eq!(store.active().count(), 0);
    }

    #[test]
    fn pending_jobs_are_not_advanced_and_not_accounted() {
        let mut pending = running_job(3, 0.0);
        pending.status = JobStatus::Pending;
        let mut store =
            JobStore::with_jobs(vec![pending], Box::new(ScriptedRandom::constant(0.9)));

        assert!(store.tick().is_empty());
        let stats = store.stats();
        assert_eq!(stats.total_jobs, 1);
        assert!(stats.accounted() < stats.total_jobs);
        assert_eq!(store.active().count(), 1);
    }

    #[test]
    fn ids_continue_after_seeded_jobs() {
        let mut store = JobStore::with_jobs(
            vec![running_job(3, 10.0), running_job(1, 10.0)],
            Box::new(ScriptedRandom::constant(0.0)),
        );
        assert_eq!(store.submit(SubmitRequest::new("new.zip")), Some(4));
    }

    #[test]
    fn partitions_split_active_and_finished() {
        let mut store = store_with(ScriptedRandom::new([0.99, 0.99, 0.0], 0.0));
        let slow = store.submit(SubmitRequest::new("slow.zip")).unwrap();
        let fast = store.submit(SubmitRequest::new("fast.zip")).unwrap();
        store.jobs[0].progress = 99.0;

        store.tick();

        let active: Vec<JobId> = store.active().map(|job| job.id).collect();
        let finished: Vec<JobId> = store.finished().map(|job| job.id).collect();
        assert_eq!(active, vec![slow]);
        assert_eq!(finished, vec![fast]);
    }
}
