//! HTML entity encode/decode tool definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{CodecMode, TextOutput, TransformTool};

/// Longest entity body we try to decode, e.g. `#x10FFFF`.
const MAX_ENTITY_LEN: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HtmlEncodeParams {
    /// Text to encode, or HTML with entities to decode.
    pub input: String,

    /// `encode` (default) or `decode`.
    #[serde(default)]
    pub mode: CodecMode,
}

/// HTML encode tool - converts markup characters to entities and back.
pub struct HtmlEncodeTool;

impl TransformTool for HtmlEncodeTool {
    type Params = HtmlEncodeParams;
    type Output = TextOutput;

    const NAME: &'static str = "html_encode";
    const TITLE: &'static str = "HTML Encoder/Decoder";
    const DESCRIPTION: &'static str = "Encode & < > \" ' as HTML entities, or decode named and numeric entities back to text.";
    const SLUG: &'static str = "html";

    fn transform(params: &HtmlEncodeParams) -> Result<TextOutput, ToolError> {
        if params.input.trim().is_empty() {
            return Ok(TextOutput::empty());
        }
        Ok(TextOutput::new(match params.mode {
            CodecMode::Encode => encode_entities(&params.input),
            CodecMode::Decode => decode_entities(&params.input),
        }))
    }

    fn summarize(output: &TextOutput) -> String {
        output.output.clone()
    }
}

pub fn encode_entities(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => encoded.push_str("&amp;"),
            '<' => encoded.push_str("&lt;"),
            '>' => encoded.push_str("&gt;"),
            '"' => encoded.push_str("&quot;"),
            '\'' => encoded.push_str("&#39;"),
            other => encoded.push(other),
        }
    }
    encoded
}

/// Decode entities; anything unrecognised is copied through unchanged.
pub fn decode_entities(input: &str) -> String {
    let mut decoded = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        let candidate = &rest[start + 1..];

        let entity = candidate
            .char_indices()
            .take(MAX_ENTITY_LEN + 1)
            .find(|(_, c)| *c == ';')
            .and_then(|(end, _)| lookup_entity(&candidate[..end]).map(|c| (c, end)));

        match entity {
            Some((c, end)) => {
                decoded.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                decoded.push('&');
                rest = candidate;
            }
        }
    }

    decoded.push_str(rest);
    decoded
}

fn lookup_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{A0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode() {
        assert_eq!(
            encode_entities("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_decode_named_and_numeric() {
        assert_eq!(decode_entities("&lt;b&gt; &amp;&#39;&#x27;&apos;"), "<b> &'''");
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{A0}b");
        assert_eq!(decode_entities("&#9731;"), "☃");
    }

    #[test]
    fn test_decode_leaves_unknown_entities() {
        assert_eq!(decode_entities("AT&T &bogus; &"), "AT&T &bogus; &");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
    }

    proptest! {
        #[test]
        fn prop_decode_reverses_encode(input in any::<String>()) {
            prop_assert_eq!(decode_entities(&encode_entities(&input)), input);
        }
    }
}
