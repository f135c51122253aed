use crate::command::context::CommandContext;
use crate::command::domain::{
    parse_payload, CommandOutcome, HintKind, SearchHitOutput, SearchOutput, SearchPayload,
    DEFAULT_SEARCH_LIMIT,
};
use anyhow::{bail, Result};
use serde_json::Value;
use verse_search::{count_keywords, split_keywords};

pub(crate) struct SearchService;

impl SearchService {
    pub fn run(&self, payload: Value, ctx: &CommandContext) -> Result<CommandOutcome> {
        let payload: SearchPayload = parse_payload(payload)?;
        let version = ctx.resolve_version(&payload.version)?;
        let keywords = split_keywords(&payload.query);
        if keywords.is_empty() {
            bail!("Search query is empty");
        }

        let hits = ctx.search().search(&version, &keywords, payload.mode)?;
        let counts = count_keywords(&hits, &keywords)?;
        let total = hits.len();
        let limit = payload.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let lang = ctx.messages.lang();
        let hits: Vec<SearchHitOutput> = hits
            .into_iter()
            .take(limit)
            .map(|hit| SearchHitOutput {
                book_name: ctx.catalog.display_name(&hit.book, lang).to_string(),
                hit,
            })
            .collect();
        let truncated = total > hits.len();

        let output = SearchOutput {
            version,
            mode: payload.mode,
            keywords,
            total,
            truncated,
            counts,
            hits,
        };
        let mut outcome = CommandOutcome::from_value(output)?;
        if truncated {
            outcome = outcome.with_hint(
                HintKind::Info,
                format!("Showing the first {limit} of {total} matches; raise limit to see more."),
            );
        }
        Ok(outcome)
    }
}
