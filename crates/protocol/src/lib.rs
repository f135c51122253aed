use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod error;
mod ordered;

pub use error::LookupError;
pub use ordered::OrderedEntries;

/// Inclusive, 1-based verse range. `start <= end` always holds.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
pub struct VerseRange {
    pub start: u32,
    pub end: u32,
}

impl VerseRange {
    /// Build a range, rejecting `start > end` and verse 0.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Option<Self> {
        if start == 0 || start > end {
            return None;
        }
        Some(Self { start, end })
    }

    #[must_use]
    pub const fn single(verse: u32) -> Self {
        Self {
            start: verse,
            end: verse,
        }
    }

    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for VerseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Verses named by a reference: the whole chapter, or an explicit range.
///
/// An explicit range keeps whatever end the user typed, however large, so it is still
/// subject to clamping.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerseSelection {
    WholeChapter,
    Range(VerseRange),
}

impl VerseSelection {
    #[must_use]
    pub const fn is_single(&self) -> bool {
        matches!(self, VerseSelection::Range(range) if range.is_single())
    }
}

impl fmt::Display for VerseSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerseSelection::WholeChapter => f.write_str("all"),
            VerseSelection::Range(range) => write!(f, "{range}"),
        }
    }
}

/// A resolved lookup target.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct Reference {
    pub versions: Vec<String>,
    pub book: String,
    pub chapter: u32,
    pub verse_range: VerseRange,
}

/// Advisory returned when an over-long verse range was shortened to the chapter end.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ClampWarning {
    pub book: String,
    pub chapter: u32,
    pub max_verse: u32,
}

impl fmt::Display for ClampWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} only has verses up to {}; the range was adjusted",
            self.book, self.chapter, self.max_verse
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Every keyword must appear somewhere in the verse.
    #[default]
    And,
    /// The whitespace-free phrase must appear in the whitespace-free verse.
    Compact,
}

impl SearchMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchMode::And => "and",
            SearchMode::Compact => "compact",
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(SearchMode::And),
            "compact" => Ok(SearchMode::Compact),
            other => Err(format!("unknown search mode '{other}' (expected and|compact)")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct SearchHit {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
    pub highlighted: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn from_lookup(err: &LookupError, message: impl Into<String>) -> Self {
        Self {
            code: err.code().to_string(),
            message: message.into(),
            hint: err.hint().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verse_range_rejects_reversed_and_zero() {
        assert!(VerseRange::new(5, 2).is_none());
        assert!(VerseRange::new(0, 2).is_none());
        assert_eq!(VerseRange::new(2, 5), Some(VerseRange { start: 2, end: 5 }));
    }

    #[test]
    fn explicit_range_is_never_the_whole_chapter() {
        let range = VerseRange::new(1, u32::MAX).unwrap();
        let selection = VerseSelection::Range(range);
        assert_ne!(selection, VerseSelection::WholeChapter);
        assert!(!selection.is_single());
        assert_eq!(selection.to_string(), format!("1-{}", u32::MAX));
        assert_eq!(VerseSelection::WholeChapter.to_string(), "all");
        assert!(VerseSelection::Range(VerseRange::single(16)).is_single());
    }

    #[test]
    fn search_mode_parses_case_insensitively() {
        assert_eq!("AND".parse::<SearchMode>(), Ok(SearchMode::And));
        assert_eq!(" compact ".parse::<SearchMode>(), Ok(SearchMode::Compact));
        assert!("or".parse::<SearchMode>().is_err());
    }

    #[test]
    fn search_mode_serializes_snake_case() {
        let raw = serde_json::to_string(&SearchMode::Compact).unwrap();
        assert_eq!(raw, "\"compact\"");
    }

    #[test]
    fn clamp_warning_mentions_max_verse() {
        let warning = ClampWarning {
            book: "John".into(),
            chapter: 3,
            max_verse: 36,
        };
        assert!(warning.to_string().contains("36"));
    }
}
