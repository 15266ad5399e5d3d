//! JSON formatter tool definition.
//!
//! Validates JSON and pretty-prints it with two-space indentation.
//! Parse errors carry the line, column and a caret excerpt of the input.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::TransformTool;

/// Characters shown on each side of a parse error.
const CONTEXT_RADIUS: usize = 20;

/// Parameters for the JSON formatter tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JsonFormatParams {
    /// JSON document to validate and format.
    pub input: String,

    /// Emit compact JSON instead of indented output.
    #[serde(default)]
    pub minify: bool,
}

/// Result of formatting a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JsonFormatOutput {
    /// Formatted document (empty for blank input).
    pub output: String,
    /// Whether the input parsed as JSON.
    pub is_valid: bool,
}

/// JSON formatter tool - validates and pretty-prints JSON.
pub struct JsonFormatTool;

impl TransformTool for JsonFormatTool {
    type Params = JsonFormatParams;
    type Output = JsonFormatOutput;

    const NAME: &'static str = "json_format";
    const TITLE: &'static str = "JSON Format/Validate";
    const DESCRIPTION: &'static str = "Validate a JSON document and format it with 2-space indentation (or minify it). Invalid JSON is reported with line, column and a marked excerpt.";
    const SLUG: &'static str = "json";

    fn transform(params: &JsonFormatParams) -> Result<JsonFormatOutput, ToolError> {
        if params.input.trim().is_empty() {
            return Ok(JsonFormatOutput {
                output: String::new(),
                is_valid: false,
            });
        }

        let parsed = parse_json(&params.input)?;
        let output = if params.minify {
            serde_json::to_string(&parsed)
        } else {
            serde_json::to_string_pretty(&parsed)
        }
        .map_err(|e| ToolError::internal(e.to_string()))?;

        Ok(JsonFormatOutput {
            output,
            is_valid: true,
        })
    }

    fn summarize(output: &JsonFormatOutput) -> String {
        output.output.clone()
    }
}

/// Parse JSON, turning failures into a readable validation error.
pub fn parse_json(input: &str) -> Result<Value, ToolError> {
    serde_json::from_str(input).map_err(|e| {
        let position = char_position(input, e.line(), e.column());
        ToolError::validation(format!(
            "Invalid JSON: {e}\n{}",
            error_context(input, position)
        ))
    })
}

/// Character offset of a 1-based line and column. Column 0 is the newline
/// that ends the previous line.
fn char_position(input: &str, line: usize, column: usize) -> usize {
    let preceding: usize = input
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(|l| l.chars().count())
        .sum();
    if column == 0 {
        preceding.saturating_sub(1)
    } else {
        preceding + column - 1
    }
}

/// Excerpt around `position` with a caret line pointing at it.
fn error_context(input: &str, position: usize) -> String {
    let chars: Vec<char> = input.chars().collect();
    let position = position.min(chars.len());
    let start = position.saturating_sub(CONTEXT_RADIUS);
    let end = (position + CONTEXT_RADIUS).min(chars.len());

    let excerpt: String = chars[start..end]
        .iter()
        .map(|c| if *c == '\n' { ' ' } else { *c })
        .collect();
    let caret = format!("{}^", " ".repeat(position - start + 3));

    format!("...{excerpt}...\n{caret}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn format(input: &str) -> Result<JsonFormatOutput, ToolError> {
        JsonFormatTool::transform(&JsonFormatParams {
            input: input.to_string(),
            minify: false,
        })
    }

    #[test]
    fn test_pretty_prints_with_two_spaces() {
        let output = format(r#"{"b":1,"a":[true,null]}"#).unwrap();
        assert!(output.is_valid);
        assert_eq!(
            output.output,
            "{\n  \"b\": 1,\n  \"a\": [\n    true,\n    null\n  ]\n}"
        );
    }

    #[test]
    fn test_minify() {
        let output = JsonFormatTool::transform(&JsonFormatParams {
            input: "{ \"a\" : [ 1, 2 ] }".to_string(),
            minify: true,
        })
        .unwrap();
        assert_eq!(output.output, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_blank_input_is_not_an_error() {
        let output = format("  \n ").unwrap();
        assert_eq!(output.output, "");
        assert!(!output.is_valid);
    }

    #[test]
    fn test_malformed_json_reports_context() {
        let err = format("{\"a\": 1,}").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid JSON: "));
        assert!(message.contains("line 1 column 9"));
        assert!(message.contains("...{\"a\": 1,}..."));
        assert!(message.ends_with('^'));
    }

    #[test]
    fn test_error_at_line_end_points_after_last_token() {
        let err = format("{\n  \"a\": tru\n}").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 3 column 0"));

        // The caret sits on the newline right after `tru`, not under `}`.
        let caret = message.lines().last().unwrap();
        assert_eq!(caret, format!("{}^", " ".repeat(12 + 3)));
    }

    #[test]
    fn test_char_position() {
        let input = "ab\ncd\n";
        assert_eq!(char_position(input, 1, 1), 0);
        assert_eq!(char_position(input, 2, 2), 4);
        assert_eq!(char_position(input, 2, 0), 2);
        assert_eq!(char_position(input, 1, 0), 0);
    }

    #[test]
    fn test_error_context_handles_multibyte_input() {
        // Must not slice inside a multi-byte character.
        assert!(format("[\"héllo wörld ✓✓✓✓✓✓✓✓✓✓✓✓✓✓✓\", ]").is_err());
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-zA-Z0-9 \"\\\\\n]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_formatting_preserves_value(value in arb_json()) {
            let input = serde_json::to_string(&value).unwrap();
            let formatted = format(&input).unwrap();
            let reparsed: Value = serde_json::from_str(&formatted.output).unwrap();
            prop_assert_eq!(reparsed, value);
        }

        #[test]
        fn prop_never_panics(input in any::<String>()) {
            let _ = format(&input);
        }
    }
}
