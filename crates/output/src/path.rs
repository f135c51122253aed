use crate::error::{OutputError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_FILE: &str = "verse_output.txt";

/// Where the rendered verse goes. `base_dir` anchors relative paths and the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub output_path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl OutputSettings {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_path: None,
            base_dir: base_dir.into(),
        }
    }

    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn fallback_path(&self) -> PathBuf {
        self.base_dir.join(DEFAULT_OUTPUT_FILE)
    }
}

/// Validate the configured output path for this host and make sure its directory exists.
///
/// An empty or unusable path is replaced by `<base_dir>/verse_output.txt`, and the
/// replacement is written back into `settings` so later calls see it.
pub fn resolve_output_path(settings: &mut OutputSettings) -> Result<PathBuf> {
    let configured = settings
        .output_path
        .as_ref()
        .filter(|path| !path.as_os_str().is_empty())
        .cloned();

    let chosen = match configured {
        Some(path) if is_usable_on_host(&path) => path,
        Some(path) => {
            let fallback = settings.fallback_path();
            log::warn!(
                "Output path {} is not valid on this host; using {}",
                path.display(),
                fallback.display()
            );
            fallback
        }
        None => {
            let fallback = settings.fallback_path();
            log::debug!("No output path configured; using {}", fallback.display());
            fallback
        }
    };
    if settings.output_path.as_deref() != Some(chosen.as_path()) {
        settings.output_path = Some(chosen.clone());
    }

    let absolute = absolutize(&chosen, &settings.base_dir)?;
    if let Some(parent) = absolute.parent() {
        fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            action: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(absolute)
}

/// Drive letter of a `C:`-style path, if it has one.
fn drive_letter(path: &Path) -> Option<char> {
    let raw = path.to_str()?;
    let mut chars = raw.chars();
    let letter = chars.next().filter(char::is_ascii_alphabetic)?;
    if chars.next() != Some(':') {
        return None;
    }
    match chars.next() {
        None | Some('/') | Some('\\') => Some(letter),
        Some(_) => None,
    }
}

#[cfg(windows)]
fn is_usable_on_host(path: &Path) -> bool {
    match drive_letter(path) {
        Some(letter) => Path::new(&format!("{letter}:\\")).exists(),
        None => true,
    }
}

#[cfg(not(windows))]
fn is_usable_on_host(path: &Path) -> bool {
    drive_letter(path).is_none()
}

fn absolutize(path: &Path, base_dir: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let joined = base_dir.join(path);
    if joined.is_absolute() {
        return Ok(joined);
    }
    let cwd = std::env::current_dir().map_err(|source| OutputError::Io {
        action: "read current directory for",
        path: joined.clone(),
        source,
    })?;
    Ok(cwd.join(joined))
}
