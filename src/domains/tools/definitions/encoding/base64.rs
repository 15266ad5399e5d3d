//! Base64 encode/decode tool definition.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{CodecMode, TextOutput, TransformTool};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Base64Params {
    /// Text to encode, or Base64 to decode.
    pub input: String,

    /// `encode` (default) or `decode`.
    #[serde(default)]
    pub mode: CodecMode,

    /// Use the URL-safe alphabet without padding.
    #[serde(default)]
    pub url_safe: bool,
}

/// Base64 tool - converts UTF-8 text to Base64 and back.
pub struct Base64Tool;

impl TransformTool for Base64Tool {
    type Params = Base64Params;
    type Output = TextOutput;

    const NAME: &'static str = "base64";
    const TITLE: &'static str = "Base64 Encoder/Decoder";
    const DESCRIPTION: &'static str = "Encode UTF-8 text as Base64 or decode Base64 back to text. Set url_safe for the URL-safe alphabet.";
    const SLUG: &'static str = "base64";

    fn transform(params: &Base64Params) -> Result<TextOutput, ToolError> {
        if params.input.trim().is_empty() {
            return Ok(TextOutput::empty());
        }
        match params.mode {
            CodecMode::Encode => Ok(TextOutput::new(encode(&params.input, params.url_safe))),
            CodecMode::Decode => decode(&params.input, params.url_safe).map(TextOutput::new),
        }
    }

    fn summarize(output: &TextOutput) -> String {
        output.output.clone()
    }
}

pub fn encode(input: &str, url_safe: bool) -> String {
    if url_safe {
        URL_SAFE_NO_PAD.encode(input)
    } else {
        STANDARD.encode(input)
    }
}

/// Decode Base64 into UTF-8 text. Surrounding whitespace is ignored and
/// URL-safe input may carry padding.
pub fn decode(input: &str, url_safe: bool) -> Result<String, ToolError> {
    let invalid = || ToolError::validation("Invalid Base64 string");
    let trimmed = input.trim();

    let bytes = if url_safe {
        URL_SAFE_NO_PAD.decode(trimmed.trim_end_matches('='))
    } else {
        STANDARD.decode(trimmed)
    }
    .map_err(|_| invalid())?;

    String::from_utf8(bytes).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_decode() {
        assert_eq!(encode("hello world", false), "aGVsbG8gd29ybGQ=");
        assert_eq!(decode("aGVsbG8gd29ybGQ=", false).unwrap(), "hello world");
        assert_eq!(decode("  aGVsbG8=\n", false).unwrap(), "hello");
    }

    #[test]
    fn test_url_safe_alphabet() {
        assert_eq!(encode("??>", false), "Pz8+");
        assert_eq!(encode("??>", true), "Pz8-");
        assert_eq!(decode("Pz8-", true).unwrap(), "??>");
    }

    #[test]
    fn test_invalid_input() {
        let err = decode("not base64!", false).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Base64 string");
        // Valid Base64 of bytes that are not UTF-8.
        assert!(decode("/w==", false).is_err());
    }

    proptest! {
        #[test]
        fn prop_decode_reverses_encode(input in any::<String>(), url_safe in any::<bool>()) {
            prop_assert_eq!(decode(&encode(&input, url_safe), url_safe).unwrap(), input);
        }
    }
}
