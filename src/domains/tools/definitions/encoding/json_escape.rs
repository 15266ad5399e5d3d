//! JSON string escape tool definition.
//!
//! Escapes text so it can be embedded in a JSON string literal, and back.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{EscapeMode, TextOutput, TransformTool};

/// Parameters for the JSON escape tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JsonEscapeParams {
    /// Text to escape, or escaped text to restore.
    pub input: String,

    /// `escape` (default) or `unescape`.
    #[serde(default)]
    pub mode: EscapeMode,
}

/// JSON escape tool - escapes control characters, quotes and backslashes.
pub struct JsonEscapeTool;

impl TransformTool for JsonEscapeTool {
    type Params = JsonEscapeParams;
    type Output = TextOutput;

    const NAME: &'static str = "json_escape";
    const TITLE: &'static str = "JSON Escape / Unescape";
    const DESCRIPTION: &'static str = "Escape text for use inside a JSON string literal (backspace, form feed, newline, carriage return, tab, double quote, backslash) or unescape it again.";
    const SLUG: &'static str = "json-escape";

    fn transform(params: &JsonEscapeParams) -> Result<TextOutput, ToolError> {
        if params.input.trim().is_empty() {
            return Ok(TextOutput::empty());
        }
        Ok(TextOutput::new(match params.mode {
            EscapeMode::Escape => escape_json(&params.input),
            EscapeMode::Unescape => unescape_json(&params.input),
        }))
    }

    fn summarize(output: &TextOutput) -> String {
        output.output.clone()
    }
}

pub fn escape_json(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{08}' => escaped.push_str("\\b"),
            '\u{0C}' => escaped.push_str("\\f"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Reverse [`escape_json`]. Also understands `\/` and `\uXXXX`; any other
/// escape sequence is kept as written.
pub fn unescape_json(input: &str) -> String {
    let mut unescaped = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => unescaped.push('\\'),
            Some('"') => unescaped.push('"'),
            Some('/') => unescaped.push('/'),
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some('t') => unescaped.push('\t'),
            Some('b') => unescaped.push('\u{08}'),
            Some('f') => unescaped.push('\u{0C}'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match decode_unicode_escape(&hex) {
                    Some(decoded) => {
                        unescaped.push(decoded);
                        for _ in 0..4 {
                            chars.next();
                        }
                    }
                    None => unescaped.push_str("\\u"),
                }
            }
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

fn decode_unicode_escape(hex: &str) -> Option<char> {
    if hex.len() != 4 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(
            escape_json("say \"hi\"\n\tC:\\tmp"),
            "say \\\"hi\\\"\\n\\tC:\\\\tmp"
        );
        assert_eq!(escape_json("\u{08}\u{0C}\r"), "\\b\\f\\r");
    }

    #[test]
    fn test_backslash_is_escaped_once() {
        // A literal backslash followed by `n` is not a newline.
        assert_eq!(escape_json("\\n"), "\\\\n");
        assert_eq!(unescape_json("\\\\n"), "\\n");
    }

    #[test]
    fn test_unescape_unicode_and_unknown_sequences() {
        assert_eq!(unescape_json("caf\\u00e9"), "café");
        assert_eq!(unescape_json("\\q\\u12"), "\\q\\u12");
        assert_eq!(unescape_json("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        let params = JsonEscapeParams {
            input: "   ".to_string(),
            mode: EscapeMode::Escape,
        };
        assert_eq!(JsonEscapeTool::transform(&params).unwrap().output, "");
    }

    #[test]
    fn test_round_trip_corpus() {
        for sample in ["", "plain", "ünïcödé ✓", "\"quoted\"", "a\\b", "line\nbreak\ttab"] {
            assert_eq!(unescape_json(&escape_json(sample)), sample);
        }
    }

    proptest! {
        #[test]
        fn prop_unescape_reverses_escape(input in any::<String>()) {
            prop_assert_eq!(unescape_json(&escape_json(&input)), input);
        }
    }
}
