//! Prompt definitions module.
//!
//! Each prompt is defined in its own file with:
//! - Metadata (name, description, arguments)
//! - Template string
//! - Optional enrichment that derives extra variables from the arguments
//!
//! ## Adding a New Prompt
//!
//! 1. Create a new file (e.g., `my_prompt.rs`)
//! 2. Implement the `PromptDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod explain_cron;
mod explain_regex;
mod structure_prompt;

use rmcp::model::PromptArgument;

use super::error::PromptError;
use super::templates::PromptArguments;

pub use explain_cron::ExplainCronPrompt;
pub use explain_regex::ExplainRegexPrompt;
pub use structure_prompt::StructurePrompt;

/// Trait for prompt definitions.
///
/// Each prompt must implement this trait to provide its metadata and template.
pub trait PromptDefinition {
    /// The unique name of the prompt.
    const NAME: &'static str;

    const TITLE: &'static str;

    /// A description of what the prompt does.
    const DESCRIPTION: &'static str;

    /// The template string with {{variable}} placeholders.
    fn template() -> &'static str;

    /// The arguments this prompt accepts.
    fn arguments() -> Vec<PromptArgument>;

    /// Add derived variables before rendering.
    fn enrich(_arguments: &mut PromptArguments) -> Result<(), PromptError> {
        Ok(())
    }
}
