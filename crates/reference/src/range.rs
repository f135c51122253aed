use verse_protocol::{ClampWarning, LookupError, VerseRange, VerseSelection};
use verse_store::BibleStore;

/// Resolved range plus the advisory raised when it had to be shortened.
pub type ResolvedRange = (VerseRange, Option<ClampWarning>);

/// Validate verse input against the chapter bounds of one version.
pub struct VerseRangeResolver<'a> {
    store: &'a BibleStore,
}

impl<'a> VerseRangeResolver<'a> {
    pub fn new(store: &'a BibleStore) -> Self {
        Self { store }
    }

    /// Resolve the verse field of a lookup form.
    ///
    /// Empty input selects the whole chapter, `N` a single verse, `N-M` a range that is
    /// clamped to the last verse of the chapter.
    pub fn resolve(
        &self,
        raw: &str,
        version: &str,
        book: &str,
        chapter: u32,
    ) -> Result<ResolvedRange, LookupError> {
        let raw = raw.trim();
        if raw.is_empty() {
            let max_verse = self.max_verse(version, book, chapter)?;
            return Ok((VerseRange { start: 1, end: max_verse }, None));
        }

        let invalid = || LookupError::InvalidVerseFormat(raw.to_string());
        match raw.split_once('-') {
            None => {
                let verse = parse_verse(raw).ok_or_else(invalid)?;
                Ok((VerseRange::single(verse), None))
            }
            Some((start, end)) => {
                let start = parse_verse(start).ok_or_else(invalid)?;
                let end = parse_verse(end).ok_or_else(invalid)?;
                if start > end {
                    return Err(LookupError::InvalidVerseRangeOrder { start, end });
                }
                self.clamp_span(start, end, version, book, chapter)
            }
        }
    }

    /// Apply the clamp rule to an already parsed selection.
    ///
    /// The whole chapter becomes `1..=max_verse`; single verses pass through unchanged.
    pub fn clamp(
        &self,
        selection: VerseSelection,
        version: &str,
        book: &str,
        chapter: u32,
    ) -> Result<ResolvedRange, LookupError> {
        match selection {
            VerseSelection::WholeChapter => {
                let max_verse = self.max_verse(version, book, chapter)?;
                Ok((VerseRange { start: 1, end: max_verse }, None))
            }
            VerseSelection::Range(range) if range.is_single() => Ok((range, None)),
            VerseSelection::Range(range) => {
                if range.start > range.end {
                    return Err(LookupError::InvalidVerseRangeOrder {
                        start: range.start,
                        end: range.end,
                    });
                }
                self.clamp_span(range.start, range.end, version, book, chapter)
            }
        }
    }

    fn clamp_span(
        &self,
        start: u32,
        end: u32,
        version: &str,
        book: &str,
        chapter: u32,
    ) -> Result<ResolvedRange, LookupError> {
        let max_verse = self.max_verse(version, book, chapter)?;
        if end <= max_verse {
            return Ok((VerseRange { start, end }, None));
        }
        if start > max_verse {
            return Err(LookupError::VerseOutOfRange {
                book: book.to_string(),
                chapter,
                verse: start,
                max_verse,
            });
        }
        log::debug!("Clamping {book} {chapter}:{start}-{end} to {max_verse}");
        Ok((
            VerseRange {
                start,
                end: max_verse,
            },
            Some(ClampWarning {
                book: book.to_string(),
                chapter,
                max_verse,
            }),
        ))
    }

    fn max_verse(&self, version: &str, book: &str, chapter: u32) -> Result<u32, LookupError> {
        match self.store.get_max_verse(version, book, chapter) {
            0 => Err(LookupError::ChapterNotFound {
                book: book.to_string(),
                chapter,
            }),
            max => Ok(max),
        }
    }
}

fn parse_verse(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u32>().ok().filter(|n| *n > 0)
}
