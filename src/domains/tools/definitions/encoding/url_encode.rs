//! URL component encode/decode tool definition.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{CodecMode, TextOutput, TransformTool};

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is percent-encoded.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UrlEncodeParams {
    /// Text to encode, or an encoded string to decode.
    pub input: String,

    /// `encode` (default) or `decode`.
    #[serde(default)]
    pub mode: CodecMode,
}

/// URL encode tool - percent-encodes a URI component.
pub struct UrlEncodeTool;

impl TransformTool for UrlEncodeTool {
    type Params = UrlEncodeParams;
    type Output = TextOutput;

    const NAME: &'static str = "url_encode";
    const TITLE: &'static str = "URL Encoder/Decoder";
    const DESCRIPTION: &'static str = "Percent-encode text as a URI component (unreserved: A-Z a-z 0-9 - _ . ! ~ * ' ( )) or decode it.";
    const SLUG: &'static str = "url";

    fn transform(params: &UrlEncodeParams) -> Result<TextOutput, ToolError> {
        if params.input.trim().is_empty() {
            return Ok(TextOutput::empty());
        }
        match params.mode {
            CodecMode::Encode => Ok(TextOutput::new(encode_component(&params.input))),
            CodecMode::Decode => decode_component(&params.input).map(TextOutput::new),
        }
    }

    fn summarize(output: &TextOutput) -> String {
        output.output.clone()
    }
}

pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// Decode a percent-encoded component.
///
/// Malformed escapes and sequences that are not UTF-8 are rejected.
pub fn decode_component(input: &str) -> Result<String, ToolError> {
    let invalid = || ToolError::validation("Invalid URL-encoded string");

    let bytes = input.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let well_formed = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !well_formed {
                return Err(invalid());
            }
        }
    }

    percent_decode_str(input)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| invalid())
}
