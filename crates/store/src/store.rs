use crate::source::VerseSource;
use crate::tree::{Chapter, VerseTree};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use verse_catalog::Catalog;
use verse_protocol::VerseRange;

/// Lazily loaded verse trees, cached once per version for the life of the store.
pub struct BibleStore {
    source: Box<dyn VerseSource>,
    cache: RwLock<HashMap<String, Arc<VerseTree>>>,
}

/// Requested verses of one chapter, grouped by version in selection order.
///
/// Versions without the chapter and verses with empty text are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedVerses {
    by_version: Vec<(String, Chapter)>,
}

impl ExtractedVerses {
    pub fn get(&self, version: &str, verse: u32) -> Option<&str> {
        self.chapter(version)
            .and_then(|chapter| chapter.get(&verse))
            .map(String::as_str)
    }

    pub fn chapter(&self, version: &str) -> Option<&Chapter> {
        self.by_version
            .iter()
            .find(|(name, _)| name == version)
            .map(|(_, chapter)| chapter)
    }

    /// Union of verse numbers across versions, ascending.
    pub fn verse_numbers(&self) -> BTreeSet<u32> {
        self.by_version
            .iter()
            .flat_map(|(_, chapter)| chapter.keys().copied())
            .collect()
    }
}

impl BibleStore {
    pub fn new(source: impl VerseSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Full tree of `version`, loading it on first use.
    ///
    /// A version that fails to load reads as an empty tree and is retried on the next call.
    pub fn get_verses(&self, version: &str) -> Arc<VerseTree> {
        if let Some(tree) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(version)
        {
            return tree.clone();
        }

        let tree = match self.source.load(version) {
            Ok(tree) => {
                log::debug!("Loaded version '{version}' ({} books)", tree.books().count());
                tree
            }
            Err(err) => {
                log::warn!("Failed to load version '{version}': {err}");
                return Arc::new(VerseTree::default());
            }
        };

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(version.to_string())
            .or_insert_with(|| Arc::new(tree))
            .clone()
    }

    pub fn is_loaded(&self, version: &str) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(version)
    }

    pub fn get_max_verse(&self, version: &str, book: &str, chapter: u32) -> u32 {
        self.get_verses(version).max_verse(book, chapter)
    }

    /// Book ids of `version` in discovery order.
    pub fn books(&self, version: &str) -> Vec<String> {
        self.get_verses(version)
            .books()
            .map(str::to_string)
            .collect()
    }

    pub fn chapter_count(&self, version: &str, book: &str) -> usize {
        self.get_verses(version).chapter_count(book)
    }

    /// Versions offered by the source, in catalog sort order.
    pub fn available_versions(&self, catalog: &Catalog) -> Vec<String> {
        let mut versions = match self.source.versions() {
            Ok(versions) => versions,
            Err(err) => {
                log::warn!("Failed to list versions: {err}");
                return Vec::new();
            }
        };
        catalog.sort_versions(&mut versions);
        versions.dedup();
        versions
    }

    /// Requested verses across `versions`.
    pub fn extract(
        &self,
        versions: &[String],
        book: &str,
        chapter: u32,
        range: VerseRange,
    ) -> ExtractedVerses {
        let mut by_version = Vec::with_capacity(versions.len());
        if range.start > range.end {
            return ExtractedVerses { by_version };
        }
        for version in versions {
            let tree = self.get_verses(version);
            let Some(verses) = tree.chapter(book, chapter) else {
                continue;
            };
            let selected: Chapter = verses
                .range(range.start..=range.end)
                .filter(|(_, text)| !text.trim().is_empty())
                .map(|(verse, text)| (*verse, text.clone()))
                .collect();
            by_version.push((version.clone(), selected));
        }
        ExtractedVerses { by_version }
    }
}
