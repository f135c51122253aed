use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use verse_protocol::OrderedEntries;

/// Verse number -> text for one chapter, ordered numerically.
pub type Chapter = BTreeMap<u32, String>;

/// Chapter number -> verses for one book, ordered numerically.
pub type Book = BTreeMap<u32, Chapter>;

/// Immutable verse tree of one version: `book -> chapter -> verse -> text`.
///
/// Books keep the order of the source artifact; chapters and verses are numeric.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerseTree {
    books: Vec<(String, Book)>,
    index: HashMap<String, usize>,
}

impl VerseTree {
    /// Parse the `book -> chapter -> verse -> text` JSON artifact.
    ///
    /// Non-object books and chapters, non-numeric chapter/verse keys and non-string texts
    /// are dropped.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let entries: OrderedEntries<Value> = serde_json::from_str(raw)?;
        let mut tree = Self::default();
        for (book, chapters) in entries {
            let Value::Object(chapters) = chapters else {
                log::debug!("Dropping non-object book '{book}'");
                continue;
            };
            let mut parsed = Book::new();
            for (chapter_key, verses) in chapters {
                let Some(chapter) = parse_number(&chapter_key) else {
                    log::debug!("Dropping non-numeric chapter key '{chapter_key}' in {book}");
                    continue;
                };
                let Value::Object(verses) = verses else {
                    log::debug!("Dropping non-object chapter {book} {chapter}");
                    continue;
                };
                let mut chapter_verses = Chapter::new();
                for (verse_key, text) in verses {
                    let Some(verse) = parse_number(&verse_key) else {
                        log::debug!("Dropping non-numeric verse key '{verse_key}' in {book} {chapter}");
                        continue;
                    };
                    match text {
                        Value::String(text) => {
                            chapter_verses.insert(verse, text);
                        }
                        _ => log::debug!("Dropping non-text verse {book} {chapter}:{verse}"),
                    }
                }
                parsed.insert(chapter, chapter_verses);
            }
            tree.push_book(book, parsed);
        }
        Ok(tree)
    }

    #[must_use]
    pub fn with_verse(mut self, book: &str, chapter: u32, verse: u32, text: &str) -> Self {
        let idx = match self.index.get(book) {
            Some(idx) => *idx,
            None => {
                self.push_book(book.to_string(), Book::new());
                self.books.len() - 1
            }
        };
        self.books[idx]
            .1
            .entry(chapter)
            .or_default()
            .insert(verse, text.to_string());
        self
    }

    fn push_book(&mut self, name: String, book: Book) {
        if let Some(idx) = self.index.get(&name) {
            self.books[*idx].1.extend(book);
            return;
        }
        self.index.insert(name.clone(), self.books.len());
        self.books.push((name, book));
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Book ids in discovery order.
    pub fn books(&self) -> impl Iterator<Item = &str> {
        self.books.iter().map(|(name, _)| name.as_str())
    }

    /// Every book with its chapters, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Book)> {
        self.books.iter().map(|(name, book)| (name.as_str(), book))
    }

    pub fn contains_book(&self, book: &str) -> bool {
        self.index.contains_key(book)
    }

    pub fn book(&self, book: &str) -> Option<&Book> {
        self.index.get(book).map(|idx| &self.books[*idx].1)
    }

    pub fn chapter(&self, book: &str, chapter: u32) -> Option<&Chapter> {
        self.book(book).and_then(|chapters| chapters.get(&chapter))
    }

    /// Greatest verse number present, or 0 when the chapter is absent.
    pub fn max_verse(&self, book: &str, chapter: u32) -> u32 {
        self.chapter(book, chapter)
            .and_then(|verses| verses.keys().next_back().copied())
            .unwrap_or(0)
    }

    pub fn chapter_count(&self, book: &str) -> usize {
        self.book(book).map_or(0, BTreeMap::len)
    }
}

fn parse_number(key: &str) -> Option<u32> {
    key.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_book_order_and_sorts_numbers() {
        let tree = VerseTree::from_json_str(
            r#"{
                "John": {"3": {"17": "b", "16": "a"}, "1": {"1": "c"}},
                "Genesis": {"1": {"10": "y", "2": "x"}}
            }"#,
        )
        .unwrap();
        assert_eq!(tree.books().collect::<Vec<_>>(), vec!["John", "Genesis"]);
        let verses: Vec<u32> = tree.chapter("Genesis", 1).unwrap().keys().copied().collect();
        assert_eq!(verses, vec![2, 10]);
        assert_eq!(tree.chapter_count("John"), 2);
    }

    #[test]
    fn drops_titles_and_nulls() {
        let tree = VerseTree::from_json_str(
            r#"{"John": {"intro": {"1": "x"}, "3": {"title": "Nicodemus", "16": "a", "18": null}}}"#,
        )
        .unwrap();
        let chapter = tree.chapter("John", 3).unwrap();
        assert_eq!(chapter.len(), 1);
        assert_eq!(tree.chapter_count("John"), 1);
        assert_eq!(tree.max_verse("John", 3), 16);
    }

    #[test]
    fn malformed_book_does_not_empty_the_version() {
        let tree = VerseTree::from_json_str(
            r#"{"Genesis": "oops", "John": {"3": {"16": "a"}}, "Acts": null}"#,
        )
        .unwrap();
        assert_eq!(tree.books().collect::<Vec<_>>(), vec!["John"]);
        assert_eq!(tree.max_verse("John", 3), 16);
    }

    #[test]
    fn max_verse_is_zero_for_missing_chapter() {
        let tree = VerseTree::default().with_verse("John", 3, 16, "a");
        assert_eq!(tree.max_verse("John", 4), 0);
        assert_eq!(tree.max_verse("Acts", 1), 0);
    }
}
