use thiserror::Error;

/// Failures of reference parsing and resolution.
///
/// Every variant is returned to the caller for localized display; none of them is
/// logged as an error by the library crates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Unknown book: {0}")]
    UnknownBook(String),

    #[error("Book {book} is not available in every selected version")]
    BookNotCommon { book: String },

    #[error("Invalid verse format: {0}")]
    InvalidVerseFormat(String),

    #[error("Start verse {start} is greater than end verse {end}")]
    InvalidVerseRangeOrder { start: u32, end: u32 },

    #[error("Unknown version: {0}")]
    UnknownVersion(String),

    #[error("No version selected")]
    NoVersionSelected,

    #[error("No verses found in {book} chapter {chapter}")]
    ChapterNotFound { book: String, chapter: u32 },

    #[error("Verse {verse} is past the end of {book} {chapter} (last verse {max_verse})")]
    VerseOutOfRange {
        book: String,
        chapter: u32,
        verse: u32,
        max_verse: u32,
    },
}

impl LookupError {
    /// Stable machine-readable code, also used as the message key.
    pub const fn code(&self) -> &'static str {
        match self {
            LookupError::InvalidReference(_) => "invalid_reference",
            LookupError::UnknownBook(_) => "unknown_book",
            LookupError::BookNotCommon { .. } => "book_not_common",
            LookupError::InvalidVerseFormat(_) => "invalid_verse_format",
            LookupError::InvalidVerseRangeOrder { .. } => "invalid_verse_range_order",
            LookupError::UnknownVersion(_) => "unknown_version",
            LookupError::NoVersionSelected => "no_version_selected",
            LookupError::ChapterNotFound { .. } => "chapter_not_found",
            LookupError::VerseOutOfRange { .. } => "verse_out_of_range",
        }
    }

    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            LookupError::InvalidReference(_) => Some("Use <book> <chapter>[:<verse>[-<verse>]]"),
            LookupError::InvalidVerseFormat(_) => Some("Use a verse number or range, e.g. 1 or 1-3"),
            LookupError::BookNotCommon { .. } => {
                Some("List shared books with `bible books` for the selected versions")
            }
            LookupError::UnknownVersion(_) => {
                Some("Run `bible versions` to list installed versions")
            }
            LookupError::NoVersionSelected => Some("Select at least one version"),
            _ => None,
        }
    }
}
