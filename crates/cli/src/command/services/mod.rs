mod library;
mod lookup;
mod output;
mod search;

use crate::command::context::CommandContext;
use crate::command::domain::{CommandAction, CommandOutcome};
use anyhow::Result;
use serde_json::Value;

pub struct Services {
    library: library::LibraryService,
    lookup: lookup::LookupService,
    output: output::OutputService,
    search: search::SearchService,
}

impl Services {
    pub fn new() -> Self {
        Self {
            library: library::LibraryService,
            lookup: lookup::LookupService,
            output: output::OutputService,
            search: search::SearchService,
        }
    }

    pub fn route(
        &self,
        action: CommandAction,
        payload: Value,
        ctx: &CommandContext,
    ) -> Result<CommandOutcome> {
        match action {
            CommandAction::Lookup => self.lookup.run(payload, ctx),
            CommandAction::Search => self.search.run(payload, ctx),
            CommandAction::Books => self.library.books(payload, ctx),
            CommandAction::Chapters => self.library.chapters(payload, ctx),
            CommandAction::Versions => self.library.versions(payload, ctx),
            CommandAction::Clear => self.output.clear(payload, ctx),
        }
    }
}
