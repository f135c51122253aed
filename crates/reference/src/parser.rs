use verse_catalog::BookNameResolver;
use verse_protocol::{LookupError, VerseRange, VerseSelection};

/// Reference text split into its book and numeric parts, before book resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference<'a> {
    pub book: &'a str,
    pub chapter: u32,
    pub verses: VerseSelection,
}

/// Resolved `<book> <chapter>[:<verse>[-<verse>]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReference {
    pub book: String,
    pub chapter: u32,
    pub verses: VerseSelection,
}

/// Split `<book-tokens> <chapter>[:<verse>[-<verse>]]`.
///
/// The numeric tail is the longest trailing run of digits, `:` and `-`; everything before
/// it is the book, so names with leading digits ("1 John 4:8") stay whole.
pub fn split_reference(text: &str) -> Result<RawReference<'_>, LookupError> {
    let invalid = || LookupError::InvalidReference(text.trim().to_string());
    let trimmed = text.trim();

    let tail_len: usize = trimmed
        .chars()
        .rev()
        .take_while(|ch| ch.is_ascii_digit() || *ch == ':' || *ch == '-')
        .map(char::len_utf8)
        .sum();
    let mut split_at = trimmed.len() - tail_len;
    // The tail has to open with the chapter number.
    while split_at < trimmed.len() && !trimmed.as_bytes()[split_at].is_ascii_digit() {
        split_at += 1;
    }
    if split_at == 0 {
        // A book needs at least one character.
        split_at = trimmed.chars().next().map_or(0, char::len_utf8);
    }
    if split_at >= trimmed.len() {
        return Err(invalid());
    }

    let book = trimmed[..split_at].trim();
    if book.is_empty() {
        return Err(invalid());
    }
    let spec = &trimmed[split_at..];

    let (chapter_text, verses_text) = match spec.split_once(':') {
        Some((chapter, verses)) => (chapter, Some(verses)),
        None => (spec, None),
    };
    let chapter = parse_positive(chapter_text).ok_or_else(invalid)?;

    let verses = match verses_text {
        None => VerseSelection::WholeChapter,
        Some(verses) => {
            let (start, end) = match verses.split_once('-') {
                Some((start, end)) => (
                    parse_positive(start).ok_or_else(invalid)?,
                    parse_positive(end).ok_or_else(invalid)?,
                ),
                None => {
                    let verse = parse_positive(verses).ok_or_else(invalid)?;
                    (verse, verse)
                }
            };
            VerseSelection::Range(VerseRange::new(start, end).ok_or_else(invalid)?)
        }
    };

    Ok(RawReference {
        book,
        chapter,
        verses,
    })
}

fn parse_positive(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u32>().ok().filter(|n| *n > 0)
}

/// Parse free-text references against the book catalog.
pub struct ReferenceParser<'a> {
    resolver: BookNameResolver<'a>,
}

impl<'a> ReferenceParser<'a> {
    pub fn new(resolver: BookNameResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Parse and resolve. Shape errors are reported before the book is looked up.
    pub fn parse(&self, text: &str) -> Result<ParsedReference, LookupError> {
        let raw = split_reference(text)?;
        let book = self.resolver.resolve(raw.book)?;
        log::debug!(
            "Parsed '{}' as {book} {}:{}",
            text.trim(),
            raw.chapter,
            raw.verses
        );
        Ok(ParsedReference {
            book,
            chapter: raw.chapter,
            verses: raw.verses,
        })
    }
}
