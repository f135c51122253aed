use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OutputError>;

#[derive(Error, Debug)]
pub enum OutputError {
    /// Replacing the target kept failing after every retry.
    #[error("Failed to write {path} after {attempts} attempt(s): {source}")]
    WriteFailure {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
