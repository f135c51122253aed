use crate::store::BibleStore;
use verse_catalog::Catalog;
use verse_protocol::LookupError;

/// Book intersection across the selected versions.
pub struct MultiVersionAligner<'a> {
    store: &'a BibleStore,
    catalog: &'a Catalog,
}

impl<'a> MultiVersionAligner<'a> {
    pub fn new(store: &'a BibleStore, catalog: &'a Catalog) -> Self {
        Self { store, catalog }
    }

    /// Books present in every version, in canonical order.
    ///
    /// Books missing from the canonical table are left out.
    pub fn common_books(&self, versions: &[String]) -> Vec<String> {
        if versions.is_empty() {
            return Vec::new();
        }
        let trees: Vec<_> = versions
            .iter()
            .map(|version| self.store.get_verses(version))
            .collect();
        self.catalog
            .books()
            .iter()
            .filter(|book| trees.iter().all(|tree| tree.contains_book(&book.id)))
            .map(|book| book.id.clone())
            .collect()
    }

    /// Reject a book that some selected version lacks.
    pub fn ensure_common(&self, versions: &[String], book: &str) -> Result<(), LookupError> {
        if versions.is_empty() {
            return Err(LookupError::NoVersionSelected);
        }
        let missing = versions
            .iter()
            .find(|version| !self.store.get_verses(version).contains_book(book));
        if let Some(version) = missing {
            log::debug!("Book '{book}' is missing from version '{version}'");
            return Err(LookupError::BookNotCommon {
                book: book.to_string(),
            });
        }
        Ok(())
    }
}
