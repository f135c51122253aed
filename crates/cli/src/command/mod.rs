mod context;
pub mod domain;
mod services;

pub use context::CommandContext;
pub use domain::{
    BooksOutput, BooksPayload, ChaptersOutput, ChaptersPayload, ClearOutput, CommandAction,
    CommandRequest, CommandResponse, HintKind, LookupOutput, LookupPayload, SearchOutput,
    SearchPayload, VersionsOutput,
};

use domain::{CommandOutcome, CommandStatus, Hint, ResponseMeta, SaveFailed};
use serde_json::Value;
use services::Services;
use std::time::Instant;
use verse_output::OutputError;
use verse_protocol::{ErrorEnvelope, LookupError};
use verse_search::SearchError;

pub struct CommandHandler {
    ctx: CommandContext,
    services: Services,
}

impl CommandHandler {
    pub fn new(ctx: CommandContext) -> Self {
        Self {
            ctx,
            services: Services::new(),
        }
    }

    pub fn execute(&self, request: CommandRequest) -> CommandResponse {
        let started = Instant::now();
        let CommandRequest { action, payload } = request;
        log::debug!("Executing action={}", action.as_str());

        let outcome: anyhow::Result<CommandOutcome> =
            self.services.route(action, payload, &self.ctx);

        let meta = ResponseMeta {
            action: Some(action.as_str().to_string()),
            language: Some(self.ctx.messages.lang().to_string()),
            duration_ms: Some(started.elapsed().as_millis() as u64),
        };

        match outcome {
            Ok(outcome) => CommandResponse {
                status: CommandStatus::Ok,
                message: None,
                error: None,
                hints: outcome.hints,
                data: outcome.data,
                meta: ResponseMeta {
                    action: outcome.meta.action.or(meta.action),
                    language: outcome.meta.language.or(meta.language),
                    duration_ms: outcome.meta.duration_ms.or(meta.duration_ms),
                },
            },
            Err(err) => {
                let classified = classify_error(&err, &self.ctx);
                log::debug!("Action {} failed: {err:#}", action.as_str());
                CommandResponse {
                    status: CommandStatus::Error,
                    message: Some(classified.error.message.clone()),
                    hints: classified.hints,
                    error: Some(classified.error),
                    data: classified.data,
                    meta,
                }
            }
        }
    }
}

pub struct ErrorClassification {
    pub error: ErrorEnvelope,
    pub hints: Vec<Hint>,
    /// Partial result worth showing despite the failure.
    pub data: Value,
}

/// Map a failed action to a stable error code, a localized message and follow-up hints.
pub fn classify_error(err: &anyhow::Error, ctx: &CommandContext) -> ErrorClassification {
    let mut data = Value::Null;
    let mut hints = Vec::new();
    let message = format!("{err:#}");

    let error = if let Some(lookup) = err.downcast_ref::<LookupError>() {
        let envelope =
            ErrorEnvelope::from_lookup(lookup, ctx.messages.describe_error(lookup, &ctx.catalog));
        if let Some(hint) = &envelope.hint {
            hints.push(Hint {
                kind: HintKind::Action,
                text: hint.clone(),
            });
        }
        envelope
    } else if let Some(failed) = err.downcast_ref::<SaveFailed>() {
        data = failed.data.clone();
        output_failure(message)
    } else if err.downcast_ref::<OutputError>().is_some() {
        output_failure(message)
    } else if err.downcast_ref::<SearchError>().is_some() {
        envelope("invalid_pattern", message, None)
    } else if err.downcast_ref::<serde_json::Error>().is_some() {
        envelope(
            "invalid_request",
            message,
            Some("Check the payload fields for this action."),
        )
    } else {
        envelope("internal", message, None)
    };

    ErrorClassification { error, hints, data }
}

fn output_failure(message: String) -> ErrorEnvelope {
    envelope(
        "output_write_failure",
        message,
        Some("Check that the output path is writable and not locked by another program."),
    )
}

fn envelope(code: &str, message: String, hint: Option<&str>) -> ErrorEnvelope {
    ErrorEnvelope {
        code: code.to_string(),
        message,
        hint: hint.map(str::to_string),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request(raw: Value) -> CommandRequest {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn ok_response_carries_meta() {
        let (ctx, _dir) = test_support::context();
        let handler = CommandHandler::new(ctx);
        let response = handler.execute(request(json!({"action": "versions"})));
        assert!(!response.is_error());
        assert_eq!(response.meta.action.as_deref(), Some("versions"));
        assert_eq!(response.meta.language.as_deref(), Some("en"));
    }

    #[test]
    fn lookup_error_is_localized_with_code() {
        let (ctx, _dir) = test_support::context();
        let handler = CommandHandler::new(ctx);
        let response = handler.execute(request(json!({
            "action": "lookup",
            "payload": {"versions": ["KJV", "WEB"], "reference": "Genesis 1:1"}
        })));
        assert!(response.is_error());
        let error = response.error.unwrap();
        assert_eq!(error.code, "book_not_common");
        assert_eq!(
            error.message,
            "Genesis is not available in every selected version."
        );
        assert_eq!(response.data, Value::Null);
    }

    #[test]
    fn wrapped_unknown_version_keeps_its_code() {
        let (ctx, _dir) = test_support::context();
        let err = anyhow::Error::new(LookupError::UnknownVersion("ESV".into()))
            .context("Failed to resolve lookup versions");
        let classified = classify_error(&err, &ctx);
        assert_eq!(classified.error.code, "unknown_version");
        assert!(classified.error.hint.unwrap().contains("bible versions"));
    }

    #[test]
    fn bad_payload_is_invalid_request() {
        let (ctx, _dir) = test_support::context();
        let handler = CommandHandler::new(ctx);
        let response = handler.execute(request(json!({
            "action": "chapters",
            "payload": {"version": "KJV"}
        })));
        assert_eq!(response.error.unwrap().code, "invalid_request");
    }

    #[test]
    fn unknown_version_suggests_listing() {
        let (ctx, _dir) = test_support::context();
        let handler = CommandHandler::new(ctx);
        let response = handler.execute(request(json!({
            "action": "search",
            "payload": {"version": "ESV", "query": "God"}
        })));
        assert_eq!(response.message.as_deref(), Some("Unknown version: ESV"));
        assert_eq!(response.error.as_ref().unwrap().code, "unknown_version");
        assert_eq!(response.hints_of(HintKind::Action).count(), 1);
    }
}
