//! Prompt-specific error types.

use thiserror::Error;

/// Errors returned by `prompts/get`.
#[derive(Debug, Error)]
pub enum PromptError {
    /// No prompt is registered under the name.
    #[error("Prompt not found: {0}")]
    NotFound(String),

    /// A required argument was absent.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// An argument was present but unusable, e.g. blank text.
    #[error("Invalid argument value for '{0}': {1}")]
    InvalidArgument(String, String),

    /// The template source itself is malformed.
    #[error("Template error: {0}")]
    TemplateError(String),
}

impl PromptError {
    /// Unknown prompt `name`.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Required argument `arg` was not supplied.
    pub fn missing_argument(arg: impl Into<String>) -> Self {
        Self::MissingArgument(arg.into())
    }

    /// Argument `arg` was rejected for `reason`.
    pub fn invalid_argument(arg: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument(arg.into(), reason.into())
    }

    /// Malformed template source.
    pub fn template(msg: impl Into<String>) -> Self {
        Self::TemplateError(msg.into())
    }
}
