use std::io::{self, Write};
use std::time::Duration;

use tracing::info;

use crate::core::error::DashError;
use crate::core::formatter::{format_progress, format_resolution_line, format_stats_line};
use crate::core::store::JobStore;
use crate::core::ticker::Ticker;

/// Drives the simulation without a terminal UI and prints resolutions as
/// they happen. Returns once no job is left running.
pub fn run(store: &mut JobStore, interval: Duration) -> Result<(), DashError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_writer(store, interval, &mut out)
}

fn run_with_writer(
    store: &mut JobStore,
    interval: Duration,
    out: &mut impl Write,
) -> Result<(), DashError> {
    let write_err = |e: io::Error| DashError::Terminal {
        message: e.to_string(),
    };

    for job in store.active() {
        writeln!(out, "#{} {} {}", job.id, job.file_name, format_progress(job.progress))
            .map_err(write_err)?;
    }

    let mut ticker = Ticker::start(interval);
    while store.stats().running_jobs > 0 && ticker.wait() {
        let report = store.tick();
        for (id, _) in &report.resolved {
            if let Some(job) = store.get(*id) {
                writeln!(out, "{}", format_resolution_line(job)).map_err(write_err)?;
            }
        }
    }
    ticker.stop();

    let stats = store.stats();
    info!(
        completed = stats.completed_jobs,
        failed = stats.failed_jobs,
        "headless run finished"
    );
    writeln!(out, "{}", format_stats_line(&stats)).map_err(write_err)?;
    out.flush().map_err(write_err)
}
