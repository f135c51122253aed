use crate::format::OutputFormatter;
use crate::messages::Messages;
use serde::Serialize;
use verse_catalog::Catalog;
use verse_protocol::{ClampWarning, LookupError, Reference, VerseRange, VerseSelection};
use verse_reference::{ReferenceParser, VerseRangeResolver};
use verse_store::{BibleStore, MultiVersionAligner};

pub const DEFAULT_REFERENCE_LANG: &str = "en";

/// Rendered lookup plus the clamp advisory, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    pub reference: Reference,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ClampWarning>,
}

/// Parse, align, resolve, extract and format in one call.
pub struct VerseLookup<'a> {
    catalog: &'a Catalog,
    store: &'a BibleStore,
    messages: &'a Messages,
    reference_lang: String,
}

impl<'a> VerseLookup<'a> {
    pub fn new(catalog: &'a Catalog, store: &'a BibleStore, messages: &'a Messages) -> Self {
        Self {
            catalog,
            store,
            messages,
            reference_lang: DEFAULT_REFERENCE_LANG.to_string(),
        }
    }

    #[must_use]
    pub fn with_reference_lang(mut self, lang: &str) -> Self {
        self.reference_lang = lang.to_string();
        self
    }

    /// Free-text reference such as `"John 3:16-18"`.
    pub fn lookup_text(&self, versions: &[String], text: &str) -> Result<LookupResult, LookupError> {
        if versions.is_empty() {
            return Err(LookupError::NoVersionSelected);
        }
        let parser =
            ReferenceParser::new(self.catalog.resolver(self.messages.lang(), &self.reference_lang));
        let parsed = parser.parse(text)?;
        self.aligner().ensure_common(versions, &parsed.book)?;

        let bound_version = self.widest_version(versions, &parsed.book, parsed.chapter)?;
        let (range, warning) = VerseRangeResolver::new(self.store).clamp(
            parsed.verses,
            bound_version,
            &parsed.book,
            parsed.chapter,
        )?;
        let shown = match parsed.verses {
            VerseSelection::WholeChapter => VerseSelection::WholeChapter,
            VerseSelection::Range(_) => VerseSelection::Range(range),
        };
        Ok(self.render(versions, parsed.book, parsed.chapter, shown, range, warning))
    }

    /// Separate book, chapter and verse fields; the verse field may be empty, `N` or `N-M`.
    pub fn lookup_fields(
        &self,
        versions: &[String],
        book: &str,
        chapter: u32,
        verse_text: &str,
    ) -> Result<LookupResult, LookupError> {
        if versions.is_empty() {
            return Err(LookupError::NoVersionSelected);
        }
        let book = self
            .catalog
            .resolver(self.messages.lang(), &self.reference_lang)
            .resolve(book)?;
        if chapter == 0 {
            return Err(LookupError::InvalidReference(format!("{book} {chapter}")));
        }
        self.aligner().ensure_common(versions, &book)?;

        let bound_version = self.widest_version(versions, &book, chapter)?;
        let (range, warning) = VerseRangeResolver::new(self.store)
            .resolve(verse_text, bound_version, &book, chapter)?;
        let shown = if verse_text.trim().is_empty() {
            VerseSelection::WholeChapter
        } else {
            VerseSelection::Range(range)
        };
        Ok(self.render(versions, book, chapter, shown, range, warning))
    }

    fn aligner(&self) -> MultiVersionAligner<'a> {
        MultiVersionAligner::new(self.store, self.catalog)
    }

    /// Version whose chapter runs longest; it bounds range clamping for the whole selection.
    fn widest_version<'v>(
        &self,
        versions: &'v [String],
        book: &str,
        chapter: u32,
    ) -> Result<&'v str, LookupError> {
        versions
            .iter()
            .map(|version| (version, self.store.get_max_verse(version, book, chapter)))
            .filter(|(_, max)| *max > 0)
            .max_by_key(|(_, max)| *max)
            .map(|(version, _)| version.as_str())
            .ok_or_else(|| LookupError::ChapterNotFound {
                book: book.to_string(),
                chapter,
            })
    }

    fn render(
        &self,
        versions: &[String],
        book: String,
        chapter: u32,
        shown: VerseSelection,
        range: VerseRange,
        warning: Option<ClampWarning>,
    ) -> LookupResult {
        let verses = self.store.extract(versions, &book, chapter, range);
        let text = OutputFormatter::new(self.catalog, self.messages)
            .format(versions, &book, chapter, shown, &verses);
        LookupResult {
            reference: Reference {
                versions: versions.to_vec(),
                book,
                chapter,
                verse_range: range,
            },
            text,
            warning,
        }
    }
}
