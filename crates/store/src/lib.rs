//! Verse text storage.
//!
//! `BibleStore` loads each version's verse tree on first use and shares it for the
//! rest of the process. `MultiVersionAligner` intersects book lists across versions.

mod aligner;
mod error;
mod source;
mod store;
mod tree;

pub use aligner::MultiVersionAligner;
pub use error::{Result, StoreError};
pub use source::{JsonDirSource, MemorySource, VerseSource};
pub use store::{BibleStore, ExtractedVerses};
pub use tree::{Book, Chapter, VerseTree};
