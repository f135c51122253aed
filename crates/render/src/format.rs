use crate::messages::Messages;
use verse_catalog::Catalog;
use verse_protocol::VerseSelection;
use verse_store::ExtractedVerses;

/// Renders extracted verses into the display block.
pub struct OutputFormatter<'a> {
    catalog: &'a Catalog,
    messages: &'a Messages,
}

impl<'a> OutputFormatter<'a> {
    pub fn new(catalog: &'a Catalog, messages: &'a Messages) -> Self {
        Self { catalog, messages }
    }

    /// Build the block for `versions` in selection order, in the messages' language.
    ///
    /// One version and one verse give the text plus a `(Book C:V, Label)` footer. Anything
    /// else gives `"<verse>  <text>"` lines, grouped per verse with a blank separator when
    /// several versions are selected, and a `(Book Chapter, Label1, Label2)` footer. A whole
    /// chapter lists the verses present in any version; a range lists every number in it.
    pub fn format(
        &self,
        versions: &[String],
        book: &str,
        chapter: u32,
        selection: VerseSelection,
        verses: &ExtractedVerses,
    ) -> String {
        let lang = self.messages.lang();
        let display_book = self.catalog.display_name(book, lang);
        let text_of = |version: &str, verse: u32| {
            verses
                .get(version, verse)
                .unwrap_or_else(|| self.messages.no_verse())
        };

        let verse_numbers: Vec<u32> = match selection {
            VerseSelection::WholeChapter => verses.verse_numbers().into_iter().collect(),
            VerseSelection::Range(range) => (range.start..=range.end).collect(),
        };

        if let ([version], [verse]) = (versions, verse_numbers.as_slice()) {
            if selection.is_single() {
                let label = self.catalog.version_label(version, lang);
                return [
                    text_of(version.as_str(), *verse).to_string(),
                    format!("({display_book} {chapter}:{verse}, {label})"),
                ]
                .join("\n");
            }
        }

        let mut lines = Vec::with_capacity(verse_numbers.len() * (versions.len() + 1) + 1);
        for verse in verse_numbers {
            for version in versions {
                lines.push(format!("{verse}  {}", text_of(version.as_str(), verse)));
            }
            if versions.len() > 1 {
                lines.push(String::new());
            }
        }

        let labels: Vec<&str> = versions
            .iter()
            .map(|version| self.catalog.version_label(version, lang))
            .collect();
        lines.push(format!(
            "({display_book} {}, {})",
            self.messages.chapter_label(chapter),
            labels.join(", ")
        ));
        lines.join("\n")
    }
}
