use crate::error::{OutputError, Result};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Bounded retry of the final replace step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The target already held exactly this content.
    Unchanged,
}

/// Moves the finished temp file over the target.
type ReplaceFn = fn(&Path, &Path) -> io::Result<()>;

/// Replaces a file through a sibling temp file so readers never see partial content.
#[derive(Clone)]
pub struct AtomicWriter {
    retry: RetryPolicy,
    replace: ReplaceFn,
}

impl fmt::Debug for AtomicWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicWriter")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Default for AtomicWriter {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl AtomicWriter {
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            retry,
            replace: |from, to| fs::rename(from, to),
        }
    }

    #[cfg(test)]
    fn with_replace(mut self, replace: ReplaceFn) -> Self {
        self.replace = replace;
        self
    }

    pub fn write(&self, path: &Path, content: &str) -> Result<WriteOutcome> {
        if let Ok(existing) = fs::read_to_string(path) {
            if existing == content {
                log::debug!("{} unchanged; skipping write", path.display());
                return Ok(WriteOutcome::Unchanged);
            }
        }

        let tmp = temp_path(path);
        let result = self.write_via(&tmp, path, content);
        if result.is_err() && tmp.exists() {
            if let Err(err) = fs::remove_file(&tmp) {
                log::warn!("Failed to remove temp file {}: {err}", tmp.display());
            }
        }
        result.map(|()| WriteOutcome::Written)
    }

    fn write_via(&self, tmp: &Path, path: &Path, content: &str) -> Result<()> {
        let io_err = |action: &'static str, at: &Path| {
            let at = at.to_path_buf();
            move |source| OutputError::Io {
                action,
                path: at,
                source,
            }
        };

        {
            let mut file = File::create(tmp).map_err(io_err("create", tmp))?;
            file.write_all(content.as_bytes())
                .map_err(io_err("write", tmp))?;
            file.flush().map_err(io_err("flush", tmp))?;
            file.sync_all().map_err(io_err("sync", tmp))?;
        }

        if let Ok(meta) = fs::metadata(path) {
            fs::set_permissions(tmp, meta.permissions())
                .map_err(io_err("copy permissions to", tmp))?;
        }

        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1;
        loop {
            match (self.replace)(tmp, path) {
                Ok(()) => {
                    log::debug!("Wrote {} ({} bytes)", path.display(), content.len());
                    return Ok(());
                }
                Err(err) if is_retryable(&err) && attempt < attempts => {
                    log::debug!(
                        "Replace of {} failed (attempt {attempt}/{attempts}): {err}",
                        path.display()
                    );
                    thread::sleep(self.retry.delay);
                    attempt += 1;
                }
                Err(source) => {
                    return Err(OutputError::WriteFailure {
                        path: path.to_path_buf(),
                        attempts: attempt,
                        source,
                    })
                }
            }
        }
    }
}

/// `.<name>.tmp-<pid>` next to the target.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("output");
    let tmp_name = format!(".{name}.tmp-{}", std::process::id());
    match path.parent() {
        Some(parent) => parent.join(tmp_name),
        None => PathBuf::from(tmp_name),
    }
}

/// Permission errors and, on Windows, sharing/lock violations from a reader holding the file.
fn is_retryable(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
        || (cfg!(windows) && matches!(err.raw_os_error(), Some(32 | 33)))
}
