use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::job::{SubmitRequest, DEFAULT_TIMEOUT, MAX_TIMEOUT};

#[derive(Debug, Parser)]
#[command(
    name = "crackboard",
    version,
    about = "Dashboard for monitoring simulated password-cracking jobs"
)]
pub struct SystemCli {
    /// File listing file names to submit at start-up, one per line
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Milliseconds between simulation ticks
    #[arg(long = "tick-ms", default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Seed for reproducible progress and outcomes
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start with sample jobs
    #[arg(long)]
    pub demo: bool,

    /// Run without the terminal UI until every job has finished
    #[arg(long)]
    pub headless: bool,

    /// Where to write logs (defaults to crackboard.log in the temp dir)
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl SystemCli {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Commands typed into the dashboard input line.
#[derive(Debug, Parser)]
#[command(name = "crackboard", no_binary_name = true, disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Commands {
    Submit(SubmitArgs),
    Help,
    Clear,
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Parser, PartialEq, Eq)]
pub struct SubmitArgs {
    #[arg(value_name = "FILE")]
    pub file_name: String,
    #[arg(long = "wordlist", value_name = "URL")]
    pub wordlist_url: Option<String>,
    #[arg(long = "timeout", default_value_t = DEFAULT_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT.as_secs()))]
    pub timeout_secs: u64,
}

static RE_WORDLIST_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/]+\S*$").expect("wordlist url pattern is valid"));

pub const COMMAND_NAMES: [&str; 5] = ["submit", "help", "clear", "quit", "exit"];

pub const HELP_LINES: [&str; 5] = [
    "Commands:",
    "  submit <file> [--wordlist <url>] [--timeout <secs>]",
    "  <file>               same as submit <file>",
    "  clear                clear the session log",
    "  quit / exit",
];

pub fn submit_args_to_request(args: SubmitArgs) -> Result<SubmitRequest, String> {
    if let Some(url) = &args.wordlist_url {
        if !RE_WORDLIST_URL.is_match(url) {
            return Err(format!("invalid wordlist url '{url}'"));
        }
    }
    Ok(SubmitRequest {
        file_name: args.file_name,
        wordlist_url: args.wordlist_url,
        timeout: Duration::from_secs(args.timeout_secs),
    })
}

/// A line whose first word is not a command is submitted as a file name.
pub fn parse_line(line: &str) -> Result<Commands, String> {
    let is_command = line
        .split_whitespace()
        .next()
        .is_some_and(|first| COMMAND_NAMES.iter().any(|name| first.eq_ignore_ascii_case(name)));
    if !is_command {
        return Ok(Commands::Submit(SubmitArgs {
            file_name: line.trim().to_string(),
            wordlist_url: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }));
    }

    let mut argv = shell_words::split(line).map_err(|err| err.to_string())?;
    argv[0] = argv[0].to_ascii_lowercase();
    let parsed = Cli::try_parse_from(argv).map_err(|err| err.to_string())?;
    Ok(parsed.command)
}
