//! Prompts domain module.
//!
//! Ready-made requests for the client's own model: structuring rough text
//! the way `prompt_build` does, and explaining regular expressions and cron
//! schedules. Definitions may enrich their arguments by running the matching
//! tool, so `explain_cron` quotes real fire times and `explain_regex` flags
//! patterns that do not compile.
//!
//! ## Architecture
//!
//! - `definitions/` - one file per prompt (`PromptDefinition`)
//! - `registry.rs` - central prompt registration
//! - `service.rs` - listing and rendering
//! - `templates.rs` - `{{var}}` / `{{#if}}` template engine
//!
//! ## Adding a New Prompt
//!
//! 1. Create a new file in `definitions/` (e.g., `my_prompt.rs`)
//! 2. Implement the `PromptDefinition` trait
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `registry.rs`

pub mod definitions;
mod error;
mod registry;
mod service;
pub mod templates;

pub use definitions::PromptDefinition;
pub use error::PromptError;
pub use registry::{get_all_prompts, prompt_names};
pub use service::PromptService;
pub use templates::PromptTemplate;
