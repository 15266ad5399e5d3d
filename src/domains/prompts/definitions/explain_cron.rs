//! Explain cron prompt definition.

use rmcp::model::PromptArgument;

use super::PromptDefinition;
use crate::domains::prompts::PromptError;
use crate::domains::prompts::templates::{PromptArguments, argument};
use crate::domains::tools::definitions::TransformTool;
use crate::domains::tools::definitions::inspect::{CronParseParams, CronParseTool};

/// Fire times quoted in the prompt.
const SAMPLE_RUNS: usize = 5;

/// Ask for a plain-language reading of a cron schedule.
pub struct ExplainCronPrompt;

impl PromptDefinition for ExplainCronPrompt {
    const NAME: &'static str = "explain_cron";
    const TITLE: &'static str = "Explain a Cron Expression";
    const DESCRIPTION: &'static str = "Ask for a plain-language explanation of a cron schedule";

    fn template() -> &'static str {
        r#"Explain in plain language when the cron expression `{{expression}}` runs.
{{#if next_runs}}
Its next fire times (UTC) are:
{{next_runs}}
{{else}}
It could not be parsed: {{error}}. Explain what is wrong and suggest a corrected expression.
{{/if}}
Describe each field and mention any surprising behaviour (day-of-month vs day-of-week, time zones)."#
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![argument("expression", "The cron expression to explain", true)]
    }

    fn enrich(arguments: &mut PromptArguments) -> Result<(), PromptError> {
        let params = CronParseParams {
            expression: arguments.get("expression").cloned().unwrap_or_default(),
            from: None,
        };
        match CronParseTool::transform(&params) {
            Ok(output) if !output.next_runs.is_empty() => {
                let runs = output
                    .next_runs
                    .iter()
                    .take(SAMPLE_RUNS)
                    .map(|run| format!("- {run}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                arguments.insert("next_runs".to_string(), runs);
            }
            Ok(_) => {
                arguments.insert("error".to_string(), "the expression is empty".to_string());
            }
            Err(e) => {
                arguments.insert("error".to_string(), e.to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enriched(expression: &str) -> PromptArguments {
        let mut args = PromptArguments::from([("expression".to_string(), expression.to_string())]);
        ExplainCronPrompt::enrich(&mut args).unwrap();
        args
    }

    #[test]
    fn test_valid_expression_lists_runs() {
        let args = enriched("*/15 * * * *");
        assert_eq!(args["next_runs"].lines().count(), SAMPLE_RUNS);
        assert!(!args.contains_key("error"));
    }

    #[test]
    fn test_invalid_expression_reports_error() {
        let args = enriched("not cron");
        assert!(args["error"].contains("Invalid cron expression"));
        assert!(!args.contains_key("next_runs"));
    }
}
