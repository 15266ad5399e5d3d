//! Backslash escape tool definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{EscapeMode, TextOutput, TransformTool};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BackslashEscapeParams {
    /// Text to escape, or escaped text to restore.
    pub input: String,

    /// `escape` (default) or `unescape`.
    #[serde(default)]
    pub mode: EscapeMode,
}

/// Backslash escape tool - prefixes backslashes and quotes with a backslash.
pub struct BackslashEscapeTool;

impl TransformTool for BackslashEscapeTool {
    type Params = BackslashEscapeParams;
    type Output = TextOutput;

    const NAME: &'static str = "backslash_escape";
    const TITLE: &'static str = "Backslash Escape/Unescape";
    const DESCRIPTION: &'static str = "Escape backslashes, double quotes and single quotes with a leading backslash, or remove those escapes.";
    const SLUG: &'static str = "escape";

    fn transform(params: &BackslashEscapeParams) -> Result<TextOutput, ToolError> {
        if params.input.trim().is_empty() {
            return Ok(TextOutput::empty());
        }
        Ok(TextOutput::new(match params.mode {
            EscapeMode::Escape => escape_backslashes(&params.input),
            EscapeMode::Unescape => unescape_backslashes(&params.input),
        }))
    }

    fn summarize(output: &TextOutput) -> String {
        output.output.clone()
    }
}

fn needs_escape(c: char) -> bool {
    matches!(c, '\\' | '"' | '\'')
}

pub fn escape_backslashes(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if needs_escape(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Drop the backslash in front of `\`, `"` and `'`; other backslashes stay.
pub fn unescape_backslashes(input: &str) -> String {
    let mut unescaped = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if needs_escape(next) {
                    unescaped.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        unescaped.push(c);
    }
    unescaped
}
