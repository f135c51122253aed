use crate::error::Result;
use crate::writer::{AtomicWriter, WriteOutcome};
use std::fs;
use std::path::{Path, PathBuf};

/// Single-slot hand-off to the display process; the last published text wins.
#[derive(Debug, Clone)]
pub struct OutputMailbox {
    path: PathBuf,
    writer: AtomicWriter,
}

impl OutputMailbox {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: AtomicWriter::default(),
        }
    }

    #[must_use]
    pub fn with_writer(mut self, writer: AtomicWriter) -> Self {
        self.writer = writer;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn publish(&self, text: &str) -> Result<WriteOutcome> {
        let outcome = self.writer.write(&self.path, text)?;
        log::info!(
            "Published {} bytes to {} ({outcome:?})",
            text.len(),
            self.path.display()
        );
        Ok(outcome)
    }

    /// Publishes the empty payload, which tells the display to show nothing.
    pub fn clear(&self) -> Result<WriteOutcome> {
        self.publish("")
    }

    /// Current text, or `None` when there is nothing worth displaying.
    pub fn peek(&self) -> Option<String> {
        let text = fs::read_to_string(&self.path).ok()?;
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn last_publish_wins() {
        let dir = tempdir().unwrap();
        let mailbox = OutputMailbox::new(dir.path().join("verse_output.txt"));
        assert_eq!(mailbox.peek(), None);
        mailbox.publish("first").unwrap();
        mailbox.publish("second").unwrap();
        assert_eq!(mailbox.peek().as_deref(), Some("second"));
    }

    #[test]
    fn clear_and_blank_text_read_as_empty() {
        let dir = tempdir().unwrap();
        let mailbox = OutputMailbox::new(dir.path().join("verse_output.txt"));
        mailbox.publish("text").unwrap();
        assert_eq!(mailbox.clear().unwrap(), WriteOutcome::Written);
        assert_eq!(mailbox.peek(), None);
        mailbox.publish(" \n\t").unwrap();
        assert_eq!(mailbox.peek(), None);
    }
}
