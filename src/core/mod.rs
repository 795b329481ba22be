pub mod batch;
pub mod demo;
pub mod error;
pub mod formatter;
pub mod job;
pub mod random;
pub mod stats;
pub mod store;
pub mod ticker;

use chrono::Local;

use error::DashError;
use job::SubmitRequest;
use store::JobStore;

use crate::cli::SystemCli;

/// Builds the store the dashboard starts from: optional demo jobs first,
/// then one submission per entry of the batch file.
pub fn build_store(args: &SystemCli) -> Result<JobStore, DashError> {
    let rng = random::from_seed(args.seed);
    let mut store = if args.demo {
        JobStore::with_jobs(demo::demo_jobs(Local::now()), rng)
    } else {
        JobStore::new(rng)
    };

    if let Some(path) = &args.file {
        for name in batch::load_file_list(path)? {
            store.submit(SubmitRequest::new(name));
        }
    }

    Ok(store)
}
