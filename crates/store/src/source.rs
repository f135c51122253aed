use crate::error::{Result, StoreError};
use crate::tree::VerseTree;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Backing storage for verse trees.
pub trait VerseSource: Send + Sync {
    fn load(&self, version: &str) -> Result<VerseTree>;

    /// Version ids the source can load, unordered.
    fn versions(&self) -> Result<Vec<String>>;
}

/// Reads `<dir>/<version>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn version_path(&self, version: &str) -> Result<PathBuf> {
        let invalid = version.trim().is_empty()
            || version.contains(['/', '\\'])
            || version == "."
            || version == "..";
        if invalid {
            return Err(StoreError::InvalidVersionName(version.to_string()));
        }
        Ok(self.dir.join(format!("{version}.json")))
    }
}

impl VerseSource for JsonDirSource {
    fn load(&self, version: &str) -> Result<VerseTree> {
        let path = self.version_path(version)?;
        let raw = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::MissingVersion {
                    version: version.to_string(),
                    path: path.clone(),
                }
            } else {
                StoreError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        VerseTree::from_json_str(&raw).map_err(|source| StoreError::Parse {
            version: version.to_string(),
            source,
        })
    }

    fn versions(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let mut versions = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                versions.push(stem.to_string());
            }
        }
        Ok(versions)
    }
}

/// In-memory source for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    trees: HashMap<String, VerseTree>,
}

impl MemorySource {
    #[must_use]
    pub fn with_version(mut self, version: &str, tree: VerseTree) -> Self {
        self.trees.insert(version.to_string(), tree);
        self
    }
}

impl VerseSource for MemorySource {
    fn load(&self, version: &str) -> Result<VerseTree> {
        self.trees
            .get(version)
            .cloned()
            .ok_or_else(|| StoreError::MissingVersion {
                version: version.to_string(),
                path: PathBuf::from("<memory>"),
            })
    }

    fn versions(&self) -> Result<Vec<String>> {
        Ok(self.trees.keys().cloned().collect())
    }
}
