//! Structure prompt definition.
//!
//! The prompt builder's request, for clients that want to run it through
//! their own model instead of the configured completion API.

use rmcp::model::PromptArgument;

use super::PromptDefinition;
use crate::domains::prompts::PromptError;
use crate::domains::prompts::templates::{PromptArguments, argument};
use crate::domains::tools::definitions::generate::SYSTEM_MESSAGE;

pub struct StructurePrompt;

impl PromptDefinition for StructurePrompt {
    const NAME: &'static str = "structure_prompt";
    const TITLE: &'static str = "Structure a Prompt";
    const DESCRIPTION: &'static str = "Turn rough text into a clear, detailed prompt for an AI system";

    fn template() -> &'static str {
        "{{instructions}}\n\nConvert this text into a well-structured prompt: {{text}}"
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![argument("text", "The rough text to turn into a prompt", true)]
    }

    fn enrich(arguments: &mut PromptArguments) -> Result<(), PromptError> {
        if arguments.get("text").is_none_or(|t| t.trim().is_empty()) {
            return Err(PromptError::invalid_argument(
                "text",
                "Please enter some text to generate a prompt",
            ));
        }
        arguments.insert("instructions".to_string(), SYSTEM_MESSAGE.to_string());
        Ok(())
    }
}
