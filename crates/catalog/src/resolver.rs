use crate::tables::{normalize, Catalog};
use verse_protocol::LookupError;

/// Outcome of one resolution strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(String),
    /// More than one book matched; resolution stops here instead of guessing.
    Ambiguous(Vec<String>),
    NoMatch,
}

/// One step of book-name resolution. Strategies run in priority order; the first
/// non-`NoMatch` outcome ends the search.
pub trait ResolveStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn resolve(&self, catalog: &Catalog, normalized: &str) -> Resolution;
}

/// Normalized input matches an alias key.
pub struct AliasKey;

impl ResolveStrategy for AliasKey {
    fn name(&self) -> &'static str {
        "alias_key"
    }

    fn resolve(&self, catalog: &Catalog, normalized: &str) -> Resolution {
        catalog
            .alias_target(normalized)
            .map_or(Resolution::NoMatch, |id| Resolution::Found(id.to_string()))
    }
}

/// Input is already a canonical id.
pub struct CanonicalId;

impl ResolveStrategy for CanonicalId {
    fn name(&self) -> &'static str {
        "canonical_id"
    }

    fn resolve(&self, catalog: &Catalog, normalized: &str) -> Resolution {
        catalog
            .canonical_ids()
            .find(|id| normalize(id) == normalized)
            .map_or(Resolution::NoMatch, |id| Resolution::Found(id.to_string()))
    }
}

/// Unique prefix of a display name in the active or reference language.
///
/// An exact display-name match on exactly one book wins even when the same text is a
/// prefix of other names ("John" vs "Johnathan").
pub struct DisplayNamePrefix {
    langs: Vec<String>,
}

impl DisplayNamePrefix {
    pub fn new(lang: &str, reference_lang: &str) -> Self {
        let mut langs = vec![lang.to_string()];
        if reference_lang != lang {
            langs.push(reference_lang.to_string());
        }
        Self { langs }
    }
}

impl ResolveStrategy for DisplayNamePrefix {
    fn name(&self) -> &'static str {
        "display_name_prefix"
    }

    fn resolve(&self, catalog: &Catalog, normalized: &str) -> Resolution {
        if normalized.is_empty() {
            return Resolution::NoMatch;
        }

        let mut exact: Vec<&str> = Vec::new();
        let mut prefixed: Vec<&str> = Vec::new();
        for book in catalog.books() {
            let names: Vec<String> = self
                .langs
                .iter()
                .filter_map(|lang| book.name(lang))
                .map(normalize)
                .collect();
            if names.iter().any(|name| name == normalized) {
                exact.push(&book.id);
            }
            if names.iter().any(|name| name.starts_with(normalized)) {
                prefixed.push(&book.id);
            }
        }

        if exact.len() == 1 {
            return Resolution::Found(exact[0].to_string());
        }
        match prefixed.as_slice() {
            [] => Resolution::NoMatch,
            [only] => Resolution::Found((*only).to_string()),
            many => Resolution::Ambiguous(many.iter().map(|id| (*id).to_string()).collect()),
        }
    }
}

/// Resolve user-typed book names to canonical ids.
pub struct BookNameResolver<'a> {
    catalog: &'a Catalog,
    strategies: Vec<Box<dyn ResolveStrategy>>,
}

impl<'a> BookNameResolver<'a> {
    pub fn new(catalog: &'a Catalog, lang: &str, reference_lang: &str) -> Self {
        Self {
            catalog,
            strategies: vec![
                Box::new(AliasKey),
                Box::new(CanonicalId),
                Box::new(DisplayNamePrefix::new(lang, reference_lang)),
            ],
        }
    }

    /// Full outcome, including ambiguity candidates.
    pub fn resolve_detailed(&self, raw: &str) -> Resolution {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return Resolution::NoMatch;
        }
        for strategy in &self.strategies {
            match strategy.resolve(self.catalog, &normalized) {
                Resolution::NoMatch => continue,
                outcome => {
                    log::debug!("Book '{raw}' -> {outcome:?} via {}", strategy.name());
                    return outcome;
                }
            }
        }
        Resolution::NoMatch
    }

    pub fn resolve(&self, raw: &str) -> Result<String, LookupError> {
        match self.resolve_detailed(raw) {
            Resolution::Found(id) => Ok(id),
            Resolution::Ambiguous(candidates) => {
                log::debug!(
                    "Book '{raw}' is ambiguous between {}",
                    candidates.join(", ")
                );
                Err(LookupError::UnknownBook(raw.trim().to_string()))
            }
            Resolution::NoMatch => Err(LookupError::UnknownBook(raw.trim().to_string())),
        }
    }
}
