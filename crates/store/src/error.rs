use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Load failures of a verse source. `BibleStore` logs these and substitutes an empty tree.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Version '{version}' not found at {path}")]
    MissingVersion { version: String, path: PathBuf },

    #[error("Invalid version name '{0}'")]
    InvalidVersionName(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed verse data for '{version}': {source}")]
    Parse {
        version: String,
        #[source]
        source: serde_json::Error,
    },
}
