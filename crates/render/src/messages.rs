use crate::error::{RenderError, Result};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use verse_catalog::Catalog;
use verse_protocol::{ClampWarning, LookupError};

pub const MSG_NO_WORD: &str = "msg_no_word";
pub const CHAPTER_LABEL: &str = "chapter_label";
pub const WARN_RANGE_MAX: &str = "warn_range_max";

const EN: &[(&str, &str)] = &[
    (MSG_NO_WORD, "No verse"),
    (CHAPTER_LABEL, "{chapter}"),
    (
        WARN_RANGE_MAX,
        "{book} {chapter} only has verses up to {max}. The range was adjusted.",
    ),
    ("invalid_reference", "Invalid reference: {input}"),
    ("unknown_book", "Unknown book name: {input}"),
    (
        "book_not_common",
        "{book} is not available in every selected version.",
    ),
    (
        "invalid_verse_format",
        "Invalid verse input: {input}. Use a number or a range such as 1-3.",
    ),
    (
        "invalid_verse_range_order",
        "The start verse ({start}) is greater than the end verse ({end}).",
    ),
    ("unknown_version", "Unknown version: {input}"),
    ("no_version_selected", "Select at least one version."),
    ("chapter_not_found", "{book} {chapter} does not exist."),
    (
        "verse_out_of_range",
        "{book} {chapter} only has verses up to {max}; verse {verse} does not exist.",
    ),
];

const KO: &[(&str, &str)] = &[
    (MSG_NO_WORD, "해당 구절이 없습니다"),
    (CHAPTER_LABEL, "{chapter}장"),
    (
        WARN_RANGE_MAX,
        "{book} {chapter}장은 {max}절까지만 존재합니다. 범위를 조정했습니다.",
    ),
    ("invalid_reference", "잘못된 성경 구절 형식입니다: {input}"),
    ("unknown_book", "알 수 없는 책 이름입니다: {input}"),
    ("book_not_common", "{book}은(는) 선택한 모든 역본에 있지 않습니다."),
    (
        "invalid_verse_format",
        "절 입력이 올바르지 않습니다: {input} (예: 1 또는 1-3)",
    ),
    (
        "invalid_verse_range_order",
        "시작 절({start})이 끝 절({end})보다 큽니다.",
    ),
    ("unknown_version", "알 수 없는 역본입니다: {input}"),
    ("no_version_selected", "역본을 하나 이상 선택하세요."),
    ("chapter_not_found", "{book} {chapter}장은 존재하지 않습니다."),
    (
        "verse_out_of_range",
        "{book} {chapter}장은 {max}절까지만 존재합니다. {verse}절은 없습니다.",
    ),
];

/// Localized user-facing texts keyed by message id.
///
/// Lookup order: override file, built-in table of the language, built-in English, the key.
#[derive(Debug, Clone)]
pub struct Messages {
    lang: String,
    entries: HashMap<String, String>,
}

impl Messages {
    pub fn builtin(lang: &str) -> Self {
        let mut entries: HashMap<String, String> = EN
            .iter()
            .map(|(key, text)| ((*key).to_string(), (*text).to_string()))
            .collect();
        if lang == "ko" {
            entries.extend(
                KO.iter()
                    .map(|(key, text)| ((*key).to_string(), (*text).to_string())),
            );
        }
        Self {
            lang: lang.to_string(),
            entries,
        }
    }

    /// Built-in table overlaid with `<translations_dir>/<lang>.json` when that file exists.
    pub fn load(lang: &str, translations_dir: Option<&Path>) -> Result<Self> {
        let mut messages = Self::builtin(lang);
        let Some(dir) = translations_dir else {
            return Ok(messages);
        };
        let path = dir.join(format!("{lang}.json"));
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("No translation override at {}", path.display());
                return Ok(messages);
            }
            Err(source) => return Err(RenderError::Io { path, source }),
        };
        let overrides: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| RenderError::Parse {
                path: path.clone(),
                source,
            })?;
        log::debug!(
            "Loaded {} translation overrides from {}",
            overrides.len(),
            path.display()
        );
        messages.entries.extend(overrides);
        Ok(messages)
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map_or(key, String::as_str)
    }

    /// Message text with `{name}` placeholders filled in.
    pub fn render(&self, key: &str, args: &[(&str, String)]) -> String {
        let mut text = self.get(key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    pub fn no_verse(&self) -> &str {
        self.get(MSG_NO_WORD)
    }

    pub fn chapter_label(&self, chapter: u32) -> String {
        self.render(CHAPTER_LABEL, &[("chapter", chapter.to_string())])
    }

    pub fn describe_warning(&self, warning: &ClampWarning, catalog: &Catalog) -> String {
        self.render(
            WARN_RANGE_MAX,
            &[
                ("book", catalog.display_name(&warning.book, &self.lang).to_string()),
                ("chapter", warning.chapter.to_string()),
                ("max", warning.max_verse.to_string()),
            ],
        )
    }

    pub fn describe_error(&self, err: &LookupError, catalog: &Catalog) -> String {
        let book = |id: &str| catalog.display_name(id, &self.lang).to_string();
        let args: Vec<(&str, String)> = match err {
            LookupError::InvalidReference(input)
            | LookupError::UnknownBook(input)
            | LookupError::UnknownVersion(input)
            | LookupError::InvalidVerseFormat(input) => vec![("input", input.clone())],
            LookupError::BookNotCommon { book: id } => vec![("book", book(id))],
            LookupError::InvalidVerseRangeOrder { start, end } => {
                vec![("start", start.to_string()), ("end", end.to_string())]
            }
            LookupError::NoVersionSelected => Vec::new(),
            LookupError::ChapterNotFound { book: id, chapter } => {
                vec![("book", book(id)), ("chapter", chapter.to_string())]
            }
            LookupError::VerseOutOfRange {
                book: id,
                chapter,
                verse,
                max_verse,
            } => vec![
                ("book", book(id)),
                ("chapter", chapter.to_string()),
                ("verse", verse.to_string()),
                ("max", max_verse.to_string()),
            ],
        };
        self.render(err.code(), &args)
    }
}
