//! Reference grammar and verse-range rules.

mod parser;
mod range;

pub use parser::{split_reference, ParsedReference, RawReference, ReferenceParser};
pub use range::{ResolvedRange, VerseRangeResolver};
