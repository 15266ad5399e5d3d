//! Explain regex prompt definition.

use regex::Regex;
use rmcp::model::PromptArgument;

use super::PromptDefinition;
use crate::domains::prompts::PromptError;
use crate::domains::prompts::templates::{PromptArguments, argument};

/// Ask for a walkthrough of a regular expression.
pub struct ExplainRegexPrompt;

impl PromptDefinition for ExplainRegexPrompt {
    const NAME: &'static str = "explain_regex";
    const TITLE: &'static str = "Explain a Regular Expression";
    const DESCRIPTION: &'static str = "Ask for a piece-by-piece explanation of a regular expression";

    fn template() -> &'static str {
        r#"Explain what the regular expression `{{pattern}}`{{#if flags}} (flags: `{{flags}}`){{/if}} matches.

Provide:
1. A breakdown of each part of the pattern
2. Examples of strings that match and strings that do not
3. Edge cases or pitfalls{{#if error}}

Note: the pattern does not compile as written ({{error}}). Point out the mistake and suggest a fix.{{/if}}"#
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![
            argument("pattern", "The regular expression to explain", true),
            argument("flags", "Flags such as g, i, m, s", false),
        ]
    }

    fn enrich(arguments: &mut PromptArguments) -> Result<(), PromptError> {
        let pattern = arguments.get("pattern").cloned().unwrap_or_default();
        if let Err(e) = Regex::new(&pattern) {
            let reason = e.to_string().lines().last().unwrap_or_default().trim().to_string();
            arguments.insert("error".to_string(), reason);
        }
        Ok(())
    }
}
