use std::path::{Path, PathBuf};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::core::error::DashError;

const DEFAULT_LOG_NAME: &str = "crackboard.log";

/// The terminal belongs to the dashboard, so logs always go to a file.
pub fn init(log_file: Option<&Path>) -> Result<PathBuf, DashError> {
    let path = log_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_NAME));
    let (dir, file_name) = split_log_path(&path)?;

    std::fs::create_dir_all(&dir).map_err(|e| DashError::Logging {
        message: format!("{}: {e}", dir.display()),
    })?;
    let file_appender = tracing_appender::rolling::never(&dir, file_name);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_appender),
        )
        .try_init()
        .map_err(|e| DashError::Logging {
            message: e.to_string(),
        })?;

    Ok(path)
}

fn split_log_path(path: &Path) -> Result<(PathBuf, String), DashError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| DashError::Logging {
            message: format!("'{}' does not name a file", path.display()),
        })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name))
}
