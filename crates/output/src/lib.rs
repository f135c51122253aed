//! Hands rendered verse text to an external display through one file.
//!
//! The file is always replaced atomically, so a reader polling it sees either the old
//! text or the new text, never a mix.

mod error;
mod mailbox;
mod path;
mod writer;

pub use error::{OutputError, Result};
pub use mailbox::OutputMailbox;
pub use path::{resolve_output_path, OutputSettings, DEFAULT_OUTPUT_FILE};
pub use writer::{
    AtomicWriter, RetryPolicy, WriteOutcome, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY,
};
