mod error;
mod highlight;
mod keyword;

pub use error::{Result, SearchError};
pub use highlight::{
    compact_pattern, keyword_pattern, HighlightMarker, DEFAULT_HIGHLIGHT_CLOSE,
    DEFAULT_HIGHLIGHT_OPEN,
};
pub use keyword::{count_keywords, split_keywords, KeywordCount, KeywordSearch};
