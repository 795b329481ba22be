use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("terminal error: {message}")]
    Terminal { message: String },
    #[error("failed to read batch file '{}': {source}", path.display())]
    BatchFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to initialise logging: {message}")]
    Logging { message: String },
}

impl DashError {
    pub fn terminal(err: impl std::fmt::Display) -> Self {
        DashError::Terminal {
            message: err.to_string(),
        }
    }
}
