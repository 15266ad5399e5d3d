//! Generator tools: identifiers and AI-assisted prompts.

mod prompt_build;
mod uuid_generate;

pub use prompt_build::{
    ChatMessage, CompletionClient, OpenRouterClient, PromptBuildParams, PromptBuildTool,
    SYSTEM_MESSAGE, build_messages, parse_completion,
};
pub use uuid_generate::{IdKind, MAX_COUNT, UuidGenerateOutput, UuidGenerateParams, UuidGenerateTool};
