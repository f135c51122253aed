use crate::error::Result;
use regex::{Captures, Regex, RegexBuilder};

pub const DEFAULT_HIGHLIGHT_OPEN: &str = r#"<span style="color:red; font-weight:bold;">"#;
pub const DEFAULT_HIGHLIGHT_CLOSE: &str = "</span>";

/// Markup wrapped around every highlighted match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarker {
    pub open: String,
    pub close: String,
}

impl Default for HighlightMarker {
    fn default() -> Self {
        Self {
            open: DEFAULT_HIGHLIGHT_OPEN.to_string(),
            close: DEFAULT_HIGHLIGHT_CLOSE.to_string(),
        }
    }
}

impl HighlightMarker {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Wrap every match of `pattern` in `text`.
    pub fn apply(&self, pattern: &Regex, text: &str) -> String {
        pattern
            .replace_all(text, |caps: &Captures<'_>| {
                format!("{}{}{}", self.open, &caps[0], self.close)
            })
            .into_owned()
    }
}

/// Case-insensitive alternation of `keywords`, longest first, so the leftmost match is
/// always the longest keyword starting there and spans never nest.
pub fn keyword_pattern(keywords: &[String]) -> Result<Option<Regex>> {
    let mut unique: Vec<&str> = keywords
        .iter()
        .map(String::as_str)
        .filter(|keyword| !keyword.is_empty())
        .collect();
    unique.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    unique.dedup();
    if unique.is_empty() {
        return Ok(None);
    }
    let alternation = unique
        .iter()
        .map(|keyword| regex::escape(keyword))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = RegexBuilder::new(&alternation)
        .case_insensitive(true)
        .build()?;
    Ok(Some(pattern))
}

/// Matches `phrase` in raw text while allowing any whitespace between its characters.
pub fn compact_pattern(phrase: &str) -> Result<Option<Regex>> {
    let parts: Vec<String> = phrase
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| regex::escape(ch.encode_utf8(&mut [0u8; 4])))
        .collect();
    if parts.is_empty() {
        return Ok(None);
    }
    let pattern = RegexBuilder::new(&parts.join(r"\s*"))
        .case_insensitive(true)
        .build()?;
    Ok(Some(pattern))
}
