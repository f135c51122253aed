use crate::command::context::CommandContext;
use crate::command::domain::{ClearOutput, CommandOutcome, SaveReport};
use anyhow::{Context as AnyhowContext, Result};
use serde_json::Value;
use verse_output::WriteOutcome;

pub(crate) struct OutputService;

impl OutputService {
    /// Publish the empty payload so the display shows nothing.
    pub fn clear(&self, _payload: Value, ctx: &CommandContext) -> Result<CommandOutcome> {
        let mailbox = ctx.mailbox()?;
        let outcome = mailbox
            .clear()
            .with_context(|| format!("Failed to clear {}", mailbox.path().display()))?;
        CommandOutcome::from_value(ClearOutput {
            saved: SaveReport {
                path: mailbox.path().display().to_string(),
                changed: outcome == WriteOutcome::Written,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::test_support::context;
    use serde_json::json;

    #[test]
    fn clear_empties_the_output_file() {
        let (ctx, dir) = context();
        let path = dir.path().join("verse_output.txt");
        std::fs::write(&path, "old text").unwrap();
        let outcome = OutputService.clear(json!({}), &ctx).unwrap();
        let output: ClearOutput = serde_json::from_value(outcome.data).unwrap();
        assert!(output.saved.changed);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
