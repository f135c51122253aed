use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use verse_protocol::{ClampWarning, ErrorEnvelope, Reference, SearchHit, SearchMode};
use verse_search::KeywordCount;

pub const DEFAULT_SEARCH_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub action: CommandAction,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

fn empty_payload() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    Lookup,
    Search,
    Books,
    Chapters,
    Versions,
    Clear,
}

impl CommandAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandAction::Lookup => "lookup",
            CommandAction::Search => "search",
            CommandAction::Books => "books",
            CommandAction::Chapters => "chapters",
            CommandAction::Versions => "versions",
            CommandAction::Clear => "clear",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: ResponseMeta,
}

impl CommandResponse {
    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }

    pub fn hints_of(&self, kind: HintKind) -> impl Iterator<Item = &str> {
        self.hints
            .iter()
            .filter(move |hint| hint.kind == kind)
            .map(|hint| hint.text.as_str())
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Clone)]
pub struct Hint {
    #[serde(rename = "type")]
    pub kind: HintKind,
    pub text: String,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    Info,
    Action,
    Warn,
}

#[derive(Debug, Serialize, Default, Clone)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[derive(Debug)]
pub struct CommandOutcome {
    pub data: Value,
    pub hints: Vec<Hint>,
    pub meta: ResponseMeta,
}

impl CommandOutcome {
    pub fn from_value<T: Serialize>(value: T) -> Result<Self> {
        Ok(Self {
            data: serde_json::to_value(value)?,
            hints: Vec::new(),
            meta: ResponseMeta::default(),
        })
    }

    #[must_use]
    pub fn with_hint(mut self, kind: HintKind, text: impl Into<String>) -> Self {
        self.hints.push(Hint {
            kind,
            text: text.into(),
        });
        self
    }
}

pub fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(Into::into)
}

/// A rendered lookup whose hand-off to the display failed.
///
/// Carries the rendered data so callers can still show it.
#[derive(Debug)]
pub struct SaveFailed {
    pub data: Value,
    pub source: verse_output::OutputError,
}

impl fmt::Display for SaveFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for SaveFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct LookupPayload {
    /// Version ids, labels or CLI tokens, in display order.
    #[serde(default)]
    pub versions: Vec<String>,
    /// Free-text reference such as `John 3:16-18`. Takes precedence over the field form.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub book: Option<String>,
    #[serde(default)]
    pub chapter: Option<u32>,
    #[serde(default)]
    pub verses: Option<String>,
    /// Publish the rendered block to the output file.
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LookupOutput {
    pub reference: Reference,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ClampWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<SaveReport>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SaveReport {
    pub path: String,
    pub changed: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SearchPayload {
    pub version: String,
    /// Whitespace-separated keywords.
    pub query: String,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchOutput {
    pub version: String,
    pub mode: SearchMode,
    pub keywords: Vec<String>,
    pub total: usize,
    #[serde(default)]
    pub truncated: bool,
    pub counts: Vec<KeywordCount>,
    pub hits: Vec<SearchHitOutput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchHitOutput {
    pub book_name: String,
    #[serde(flatten)]
    pub hit: SearchHit,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct BooksPayload {
    #[serde(default)]
    pub versions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BooksOutput {
    pub versions: Vec<String>,
    pub books: Vec<BookEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ChaptersPayload {
    pub version: String,
    pub book: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChaptersOutput {
    pub version: String,
    pub book: String,
    pub name: String,
    pub chapters: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionsOutput {
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearOutput {
    pub saved: SaveReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn request_payload_defaults_to_empty_object() {
        let request: CommandRequest = serde_json::from_value(json!({"action": "versions"})).unwrap();
        assert_eq!(request.action, CommandAction::Versions);
        assert_eq!(request.payload, json!({}));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let parsed = serde_json::from_value::<CommandRequest>(json!({"action": "index"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn search_payload_defaults_to_and_mode() {
        let payload: SearchPayload =
            parse_payload(json!({"version": "KJV", "query": "God loved"})).unwrap();
        assert_eq!(payload.mode, SearchMode::And);
        assert_eq!(payload.limit, None);
    }

    #[test]
    fn hints_serialize_with_type_tag() {
        let outcome = CommandOutcome::from_value(json!({}))
            .unwrap()
            .with_hint(HintKind::Warn, "range adjusted");
        let raw = serde_json::to_value(&outcome.hints).unwrap();
        assert_eq!(raw, json!([{"type": "warn", "text": "range adjusted"}]));
    }
}
