use crate::error::Result;
use crate::highlight::{compact_pattern, keyword_pattern, HighlightMarker};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use verse_protocol::{SearchHit, SearchMode};
use verse_store::BibleStore;

/// Occurrences of one keyword across a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

/// Split a typed phrase into keywords on whitespace.
pub fn split_keywords(phrase: &str) -> Vec<String> {
    phrase.split_whitespace().map(str::to_string).collect()
}

/// Keyword search over one version of the store.
pub struct KeywordSearch<'a> {
    store: &'a BibleStore,
    marker: HighlightMarker,
}

impl<'a> KeywordSearch<'a> {
    pub fn new(store: &'a BibleStore) -> Self {
        Self {
            store,
            marker: HighlightMarker::default(),
        }
    }

    #[must_use]
    pub fn with_marker(mut self, marker: HighlightMarker) -> Self {
        self.marker = marker;
        self
    }

    /// Verses of `version` matching `keywords`, in discovery order.
    ///
    /// `And` needs every keyword somewhere in the verse. `Compact` joins the keywords and
    /// looks for the whitespace-free phrase inside the whitespace-free verse.
    pub fn search(
        &self,
        version: &str,
        keywords: &[String],
        mode: SearchMode,
    ) -> Result<Vec<SearchHit>> {
        let matcher = match Matcher::build(keywords, mode)? {
            Some(matcher) => matcher,
            None => return Ok(Vec::new()),
        };

        let tree = self.store.get_verses(version);
        let mut hits = Vec::new();
        for (book, chapters) in tree.iter() {
            for (chapter, verses) in chapters {
                for (verse, text) in verses {
                    if !matcher.is_match(text) {
                        continue;
                    }
                    hits.push(SearchHit {
                        book: book.to_string(),
                        chapter: *chapter,
                        verse: *verse,
                        text: text.clone(),
                        highlighted: self.marker.apply(matcher.highlight(), text),
                    });
                }
            }
        }
        log::debug!(
            "Search {:?} ({}) in '{version}': {} hits",
            keywords,
            mode.as_str(),
            hits.len()
        );
        Ok(hits)
    }
}

enum Matcher {
    And {
        each: Vec<Regex>,
        highlight: Regex,
    },
    Compact {
        phrase: Regex,
        highlight: Regex,
    },
}

impl Matcher {
    fn build(keywords: &[String], mode: SearchMode) -> Result<Option<Self>> {
        match mode {
            SearchMode::And => {
                let Some(highlight) = keyword_pattern(keywords)? else {
                    return Ok(None);
                };
                let each = keywords
                    .iter()
                    .filter(|keyword| !keyword.is_empty())
                    .map(|keyword| literal(keyword))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Some(Matcher::And { each, highlight }))
            }
            SearchMode::Compact => {
                let collapsed: String = keywords
                    .concat()
                    .chars()
                    .filter(|ch| !ch.is_whitespace())
                    .collect();
                let Some(highlight) = compact_pattern(&collapsed)? else {
                    return Ok(None);
                };
                let phrase = literal(&collapsed)?;
                Ok(Some(Matcher::Compact { phrase, highlight }))
            }
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::And { each, .. } => each.iter().all(|re| re.is_match(text)),
            Matcher::Compact { phrase, .. } => {
                let collapsed: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
                phrase.is_match(&collapsed)
            }
        }
    }

    fn highlight(&self) -> &Regex {
        match self {
            Matcher::And { highlight, .. } | Matcher::Compact { highlight, .. } => highlight,
        }
    }
}

fn literal(keyword: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()?)
}

/// Case-insensitive, non-overlapping occurrence counts of each keyword over `hits`.
///
/// Counts follow keyword input order; repeated keywords are counted once.
pub fn count_keywords(hits: &[SearchHit], keywords: &[String]) -> Result<Vec<KeywordCount>> {
    let mut counts: Vec<KeywordCount> = Vec::new();
    for keyword in keywords {
        if keyword.is_empty() || counts.iter().any(|c| &c.keyword == keyword) {
            continue;
        }
        let pattern = literal(keyword)?;
        let count = hits
            .iter()
            .map(|hit| pattern.find_iter(&hit.text).count())
            .sum();
        counts.push(KeywordCount {
            keyword: keyword.clone(),
            count,
        });
    }
    Ok(counts)
}
