//! What the server offers, split by MCP capability.
//!
//! - `tools`: the developer utilities and the session tools over shared state
//! - `resources`: read-only views of that state
//! - `prompts`: prompt templates, some enriched by running the tools
//!
//! All three read from the same `ToolContext`.

pub mod prompts;
pub mod resources;
pub mod tools;
