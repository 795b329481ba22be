use std::time::Duration;

use chrono::{DateTime, Local};

use crate::core::job::{Job, JobStatus};
use crate::core::stats::Stats;
use crate::core::store::MAX_PROGRESS;

pub const CALCULATING: &str = "Calculating...";

pub fn format_clock(time: &DateTime<Local>) -> String {
    time.format("%H:%M:%S").to_string()
}

pub fn format_progress(progress: f64) -> String {
    format!("{}%", progress.round() as u64)
}

/// Compact form used for time-left estimates, e.g. `1h 4m`, `10m 30s`, `9s`.
pub fn format_short_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Linear extrapolation from the progress made so far.
pub fn estimate_time_left(job: &Job, now: DateTime<Local>) -> Option<Duration> {
    if job.status != JobStatus::Running || job.progress <= 0.0 {
        return None;
    }
    let elapsed = (now - job.start_time).to_std().ok()?;
    let remaining = (MAX_PROGRESS - job.progress).max(0.0);
    Duration::try_from_secs_f64(elapsed.as_secs_f64() * (remaining / job.progress)).ok()
}

pub fn format_time_left(job: &Job, now: DateTime<Local>) -> String {
    estimate_time_left(job, now)
        .map(format_short_duration)
        .unwrap_or_else(|| CALCULATING.to_string())
}

pub fn format_resolution_line(job: &Job) -> String {
    let end = job
        .end_time
        .as_ref()
        .map(format_clock)
        .unwrap_or_else(|| "N/A".to_string());
    let detail = match (job.password(), job.error()) {
        (Some(password), _) => format!("password={password}"),
        (None, Some(error)) => format!("error={error}"),
        (None, None) => String::new(),
    };
    format!(
        "#{} {} {} at {end} {detail}",
        job.id,
        job.file_name,
        job.status.label()
    )
    .trim_end()
    .to_string()
}

pub fn format_stats_line(stats: &Stats) -> String {
    format!(
        "total={} running={} completed={} failed={}",
        stats.total_jobs, stats.running_jobs, stats.completed_jobs, stats.failed_jobs
    )
}
