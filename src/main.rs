mod cli;
mod core;
mod headless;
mod logging;
mod tui;

use clap::Parser;

use crate::cli::SystemCli;
use crate::core::error::DashError;

fn main() {
    let args = SystemCli::parse();
    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(args: SystemCli) -> Result<(), DashError> {
    let log_path = logging::init(args.log_file.as_deref())?;
    tracing::info!(log = %log_path.display(), headless = args.headless, "starting crackboard");

    let mut store = core::build_store(&args)?;
    if args.headless {
        headless::run(&mut store, args.tick_interval())
    } else {
        tui::run(store, args.tick_interval())
    }
}
