//! Verse block rendering.
//!
//! `OutputFormatter` turns extracted verses into the display text, `Messages` holds the
//! localized strings, and `VerseLookup` runs the whole reference-to-text pipeline.

mod error;
mod format;
mod lookup;
mod messages;

pub use error::{RenderError, Result};
pub use format::OutputFormatter;
pub use lookup::{LookupResult, VerseLookup, DEFAULT_REFERENCE_LANG};
pub use messages::{Messages, CHAPTER_LABEL, MSG_NO_WORD, WARN_RANGE_MAX};
