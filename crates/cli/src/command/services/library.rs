use crate::command::context::CommandContext;
use crate::command::domain::{
    parse_payload, BookEntry, BooksOutput, BooksPayload, ChaptersOutput, ChaptersPayload,
    CommandOutcome, HintKind, VersionEntry, VersionsOutput,
};
use anyhow::Result;
use serde_json::Value;
use verse_protocol::LookupError;
use verse_store::MultiVersionAligner;

/// Read-only queries over the installed versions and book tables.
pub(crate) struct LibraryService;

impl LibraryService {
    pub fn books(&self, payload: Value, ctx: &CommandContext) -> Result<CommandOutcome> {
        let payload: BooksPayload = parse_payload(payload)?;
        let versions = ctx.resolve_versions(&payload.versions)?;
        if versions.is_empty() {
            return Err(LookupError::NoVersionSelected.into());
        }
        let lang = ctx.messages.lang();
        let books = MultiVersionAligner::new(&ctx.store, &ctx.catalog)
            .common_books(&versions)
            .into_iter()
            .map(|id| BookEntry {
                name: ctx.catalog.display_name(&id, lang).to_string(),
                id,
            })
            .collect();
        CommandOutcome::from_value(BooksOutput { versions, books })
    }

    pub fn chapters(&self, payload: Value, ctx: &CommandContext) -> Result<CommandOutcome> {
        let payload: ChaptersPayload = parse_payload(payload)?;
        let version = ctx.resolve_version(&payload.version)?;
        let book = ctx
            .catalog
            .resolver(ctx.messages.lang(), &ctx.config.reference_language)
            .resolve(&payload.book)?;
        let chapters = ctx.store.chapter_count(&version, &book);
        let output = ChaptersOutput {
            name: ctx
                .catalog
                .display_name(&book, ctx.messages.lang())
                .to_string(),
            version,
            book,
            chapters,
        };
        let mut outcome = CommandOutcome::from_value(&output)?;
        if chapters == 0 {
            outcome = outcome.with_hint(
                HintKind::Info,
                format!("{} has no chapters in {}", output.name, output.version),
            );
        }
        Ok(outcome)
    }

    pub fn versions(&self, _payload: Value, ctx: &CommandContext) -> Result<CommandOutcome> {
        let lang = ctx.messages.lang();
        let versions = ctx
            .store
            .available_versions(&ctx.catalog)
            .into_iter()
            .map(|id| VersionEntry {
                label: ctx.catalog.version_label(&id, lang).to_string(),
                token: ctx.catalog.cli_token(&id).map(str::to_string),
                id,
            })
            .collect();
        CommandOutcome::from_value(VersionsOutput { versions })
    }
}
