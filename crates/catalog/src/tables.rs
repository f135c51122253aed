use crate::error::{CatalogError, Result};
use crate::resolver::BookNameResolver;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use verse_protocol::OrderedEntries;

pub const ALIASES_BOOK_FILE: &str = "aliases_book.json";
pub const ALIASES_VERSION_FILE: &str = "aliases_version.json";
pub const ALIASES_VERSION_CLI_FILE: &str = "aliases_version_cli.json";
pub const STANDARD_BOOK_FILE: &str = "standard_book.json";
pub const SORT_ORDER_FILE: &str = "sort_order.json";

/// Rank given to versions whose prefix is not listed in the sort-order table.
pub const DEFAULT_SORT_RANK: u32 = 99;

/// Per-language display names of one canonical book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookNames {
    pub id: String,
    pub names: HashMap<String, String>,
}

impl BookNames {
    pub fn name(&self, lang: &str) -> Option<&str> {
        self.names.get(lang).map(String::as_str)
    }
}

/// Display label of a version: either one label for every language or a per-language table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum VersionAlias {
    Plain(String),
    Localized { aliases: HashMap<String, String> },
}

impl VersionAlias {
    fn label(&self, lang: &str) -> Option<&str> {
        match self {
            VersionAlias::Plain(label) => Some(label.as_str()),
            VersionAlias::Localized { aliases } => aliases.get(lang).map(String::as_str),
        }
    }

    fn labels(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            VersionAlias::Plain(label) => Box::new(std::iter::once(label.as_str())),
            VersionAlias::Localized { aliases } => Box::new(aliases.values().map(String::as_str)),
        }
    }
}

/// Read-only name tables loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    aliases: HashMap<String, String>,
    books: Vec<BookNames>,
    positions: HashMap<String, usize>,
    versions: HashMap<String, VersionAlias>,
    cli_tokens: Vec<(String, String)>,
    sort_order: HashMap<String, u32>,
}

/// Lowercase and drop whitespace and periods, so "1 Jn." and "1jn" compare equal.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

impl Catalog {
    /// Load every name table from `names_dir`.
    ///
    /// Missing files degrade to empty tables (logged); unreadable or malformed files are errors.
    pub fn load(names_dir: &Path) -> Result<Self> {
        let mut catalog = Self::default();

        let standard: OrderedEntries<HashMap<String, String>> =
            read_table(&names_dir.join(STANDARD_BOOK_FILE), true)?.unwrap_or_default();
        for (id, names) in standard {
            catalog.push_book(id, names);
        }

        let aliases: OrderedEntries<String> =
            read_table(&names_dir.join(ALIASES_BOOK_FILE), true)?.unwrap_or_default();
        for (alias, id) in aliases {
            catalog.insert_alias(&alias, id);
        }

        let versions: HashMap<String, VersionAlias> =
            read_table(&names_dir.join(ALIASES_VERSION_FILE), true)?.unwrap_or_default();
        catalog.versions = versions;

        let cli: OrderedEntries<String> =
            read_table(&names_dir.join(ALIASES_VERSION_CLI_FILE), false)?.unwrap_or_default();
        catalog.cli_tokens = cli.into_iter().collect();

        catalog.sort_order =
            read_table(&names_dir.join(SORT_ORDER_FILE), false)?.unwrap_or_default();

        log::debug!(
            "Loaded catalog from {}: {} books, {} aliases, {} version labels",
            names_dir.display(),
            catalog.books.len(),
            catalog.aliases.len(),
            catalog.versions.len()
        );
        Ok(catalog)
    }

    #[must_use]
    pub fn with_book(mut self, id: &str, names: &[(&str, &str)]) -> Self {
        let names = names
            .iter()
            .map(|(lang, name)| ((*lang).to_string(), (*name).to_string()))
            .collect();
        self.push_book(id.to_string(), names);
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: &str, id: &str) -> Self {
        self.insert_alias(alias, id.to_string());
        self
    }

    #[must_use]
    pub fn with_version_alias(mut self, version: &str, alias: VersionAlias) -> Self {
        self.versions.insert(version.to_string(), alias);
        self
    }

    #[must_use]
    pub fn with_cli_token(mut self, version: &str, token: &str) -> Self {
        self.cli_tokens.push((version.to_string(), token.to_string()));
        self
    }

    #[must_use]
    pub fn with_sort_rank(mut self, prefix: &str, rank: u32) -> Self {
        self.sort_order.insert(prefix.to_string(), rank);
        self
    }

    fn push_book(&mut self, id: String, names: HashMap<String, String>) {
        if self.positions.contains_key(&id) {
            log::debug!("Duplicate canonical book '{id}' ignored");
            return;
        }
        self.positions.insert(id.clone(), self.books.len());
        self.books.push(BookNames { id, names });
    }

    fn insert_alias(&mut self, alias: &str, id: String) {
        let key = normalize(alias);
        if key.is_empty() {
            return;
        }
        self.aliases.entry(key).or_insert(id);
    }

    /// Books in canonical order.
    pub fn books(&self) -> &[BookNames] {
        &self.books
    }

    pub fn canonical_position(&self, book: &str) -> Option<usize> {
        self.positions.get(book).copied()
    }

    pub(crate) fn alias_target(&self, normalized: &str) -> Option<&str> {
        self.aliases.get(normalized).map(String::as_str)
    }

    /// Canonical ids known to the catalog: the ordering table plus every alias target.
    pub(crate) fn canonical_ids(&self) -> impl Iterator<Item = &str> {
        self.books
            .iter()
            .map(|book| book.id.as_str())
            .chain(self.aliases.values().map(String::as_str))
    }

    /// Localized book name, or the canonical id when the table has no entry for `lang`.
    pub fn display_name<'a>(&'a self, book: &'a str, lang: &str) -> &'a str {
        self.canonical_position(book)
            .and_then(|idx| self.books[idx].name(lang))
            .unwrap_or(book)
    }

    /// Localized version label, or the version id itself.
    pub fn version_label<'a>(&'a self, version: &'a str, lang: &str) -> &'a str {
        self.versions
            .get(version)
            .and_then(|alias| alias.label(lang))
            .unwrap_or(version)
    }

    pub fn cli_token(&self, version: &str) -> Option<&str> {
        self.cli_tokens
            .iter()
            .find(|(id, _)| id == version)
            .map(|(_, token)| token.as_str())
    }

    /// Map a user-typed version token to a version id.
    ///
    /// Tries the CLI short token exactly, then a known version id, then any label or token
    /// case-insensitively.
    pub fn resolve_version(&self, token: &str) -> Option<String> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if let Some((id, _)) = self.cli_tokens.iter().find(|(_, short)| short == token) {
            return Some(id.clone());
        }
        if self.versions.contains_key(token) {
            return Some(token.to_string());
        }
        if let Some(id) = self
            .versions
            .keys()
            .find(|id| id.eq_ignore_ascii_case(token))
        {
            return Some(id.clone());
        }
        if let Some((id, _)) = self
            .cli_tokens
            .iter()
            .find(|(_, short)| short.eq_ignore_ascii_case(token))
        {
            return Some(id.clone());
        }
        let lowered = token.to_lowercase();
        let mut by_label: Vec<&String> = self
            .versions
            .iter()
            .filter(|(_, alias)| alias.labels().any(|label| label.to_lowercase() == lowered))
            .map(|(id, _)| id)
            .collect();
        by_label.sort();
        by_label.first().map(|id| (*id).clone())
    }

    /// Rank of the first whitespace-separated token of the version id.
    pub fn sort_rank(&self, version: &str) -> u32 {
        version
            .split_whitespace()
            .next()
            .and_then(|prefix| self.sort_order.get(prefix).copied())
            .unwrap_or(DEFAULT_SORT_RANK)
    }

    /// Order versions by prefix rank, then by name.
    pub fn sort_versions(&self, versions: &mut [String]) {
        versions.sort_by(|a, b| {
            self.sort_rank(a)
                .cmp(&self.sort_rank(b))
                .then_with(|| a.cmp(b))
        });
    }

    pub fn resolver(&self, lang: &str, reference_lang: &str) -> BookNameResolver<'_> {
        BookNameResolver::new(self, lang, reference_lang)
    }
}

fn read_table<T: DeserializeOwned>(path: &Path, required: bool) -> Result<Option<T>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            if required {
                log::warn!("Name table {} not found; using an empty table", path.display());
            } else {
                log::debug!("Optional name table {} not present", path.display());
            }
            return Ok(None);
        }
        Err(source) => {
            return Err(CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
