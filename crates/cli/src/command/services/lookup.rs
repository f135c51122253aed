use crate::command::context::CommandContext;
use crate::command::domain::{
    parse_payload, CommandOutcome, HintKind, LookupOutput, LookupPayload, SaveFailed, SaveReport,
};
use anyhow::{bail, Result};
use serde_json::Value;
use verse_output::WriteOutcome;

pub(crate) struct LookupService;

impl LookupService {
    pub fn run(&self, payload: Value, ctx: &CommandContext) -> Result<CommandOutcome> {
        let payload: LookupPayload = parse_payload(payload)?;
        let versions = ctx.resolve_versions(&payload.versions)?;
        let lookup = ctx.lookup();
        let result = match (&payload.reference, &payload.book) {
            (Some(reference), _) => lookup.lookup_text(&versions, reference)?,
            (None, Some(book)) => lookup.lookup_fields(
                &versions,
                book,
                payload.chapter.unwrap_or(0),
                payload.verses.as_deref().unwrap_or(""),
            )?,
            (None, None) => bail!("lookup needs payload.reference or payload.book"),
        };

        let warning_text = result
            .warning
            .as_ref()
            .map(|warning| ctx.messages.describe_warning(warning, &ctx.catalog));
        let mut output = LookupOutput {
            reference: result.reference,
            text: result.text,
            warning: result.warning,
            saved: None,
        };

        if payload.save {
            let published = ctx
                .mailbox()
                .and_then(|mailbox| {
                    let outcome = mailbox.publish(&output.text)?;
                    Ok((mailbox, outcome))
                });
            match published {
                Ok((mailbox, outcome)) => {
                    output.saved = Some(SaveReport {
                        path: mailbox.path().display().to_string(),
                        changed: outcome == WriteOutcome::Written,
                    });
                }
                Err(source) => {
                    let data = serde_json::to_value(&output)?;
                    return Err(SaveFailed { data, source }.into());
                }
            }
        }

        let mut outcome = CommandOutcome::from_value(output)?;
        if let Some(text) = warning_text {
            outcome = outcome.with_hint(HintKind::Warn, text);
        }
        Ok(outcome)
    }
}
