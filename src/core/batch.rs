use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::core::error::DashError;

/// Reads a list of file names to submit, one per line.
pub fn load_file_list(path: &Path) -> Result<Vec<String>, DashError> {
    let to_error = |source| DashError::BatchFile {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(to_error)?;
    parse_file_list(file).map_err(to_error)
}

pub fn parse_file_list(reader: impl Read) -> Result<Vec<String>, std::io::Error> {
    let reader = BufReader::new(reader);
    let mut names = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        names.push(trimmed.to_string());
    }

    Ok(names)
}
