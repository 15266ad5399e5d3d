//! JWT decoder tool definition.
//!
//! Decoding only: the signature is passed through, never verified.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::TransformTool;

const INVALID_TOKEN: &str = "Invalid JWT token";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JwtDecodeParams {
    /// Token in compact `header.payload.signature` form.
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JwtDecodeOutput {
    pub header: Value,
    pub payload: Value,
    /// Raw signature segment.
    pub signature: String,
    /// `exp` claim as RFC 3339, when numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    /// `iat` claim as RFC 3339, when numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    /// Whether `exp` lies in the past. Absent without an `exp` claim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
}

pub struct JwtDecodeTool;

impl TransformTool for JwtDecodeTool {
    type Params = JwtDecodeParams;
    type Output = JwtDecodeOutput;

    const NAME: &'static str = "jwt_decode";
    const TITLE: &'static str = "JWT Decoder";
    const DESCRIPTION: &'static str = "Decode the header and payload of a JSON Web Token. The signature is shown but not verified.";
    const SLUG: &'static str = "jwt";

    fn transform(params: &JwtDecodeParams) -> Result<JwtDecodeOutput, ToolError> {
        let token = params.token.trim();
        if token.is_empty() {
            return Ok(JwtDecodeOutput::default());
        }
        decode_token(token, Utc::now())
    }

    fn summarize(output: &JwtDecodeOutput) -> String {
        let header = serde_json::to_string_pretty(&output.header).unwrap_or_default();
        let payload = serde_json::to_string_pretty(&output.payload).unwrap_or_default();
        let mut summary = format!("Header:\n{header}\n\nPayload:\n{payload}");
        if let Some(expires_at) = &output.expires_at {
            let status = if output.expired == Some(true) { "expired" } else { "valid" };
            summary.push_str(&format!("\n\nExpires: {expires_at} ({status})"));
        }
        summary
    }
}

/// Decode `token`, judging expiry against `now`.
pub fn decode_token(token: &str, now: DateTime<Utc>) -> Result<JwtDecodeOutput, ToolError> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(ToolError::validation(INVALID_TOKEN));
    };

    let header = decode_segment(header)?;
    let payload = decode_segment(payload)?;

    let expires = timestamp_claim(&payload, "exp");
    let issued = timestamp_claim(&payload, "iat");

    Ok(JwtDecodeOutput {
        header,
        signature: signature.to_string(),
        expires_at: expires.map(rfc3339),
        issued_at: issued.map(rfc3339),
        expired: expires.map(|exp| exp <= now),
        payload,
    })
}

fn decode_segment(segment: &str) -> Result<Value, ToolError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|_| ToolError::validation(INVALID_TOKEN))?;
    let value: Value =
        serde_json::from_slice(&bytes).map_err(|_| ToolError::validation(INVALID_TOKEN))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(ToolError::validation(INVALID_TOKEN))
    }
}

fn timestamp_claim(payload: &Value, claim: &str) -> Option<DateTime<Utc>> {
    let seconds = payload.get(claim)?.as_f64()?;
    DateTime::from_timestamp(seconds.trunc() as i64, 0)
}

fn rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(value: &Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap())
    }

    fn token(payload: Value) -> String {
        format!(
            "{}.{}.sig",
            encode(&json!({"alg": "HS256", "typ": "JWT"})),
            encode(&payload)
        )
    }

    #[test]
    fn test_decodes_header_and_payload() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let output = decode_token(
            &token(json!({"sub": "1234567890", "iat": 1516239022, "exp": 1_800_000_000})),
            now,
        )
        .unwrap();

        assert_eq!(output.header["alg"], "HS256");
        assert_eq!(output.payload["sub"], "1234567890");
        assert_eq!(output.signature, "sig");
        assert_eq!(output.issued_at.as_deref(), Some("2018-01-18T01:30:22Z"));
        assert_eq!(output.expired, Some(false));
    }

    #[test]
    fn test_expired_token() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let output = decode_token(&token(json!({"exp": 1_600_000_000})), now).unwrap();
        assert_eq!(output.expired, Some(true));

        let no_exp = decode_token(&token(json!({"sub": "x"})), now).unwrap();
        assert!(no_exp.expired.is_none());
    }

    #[test]
    fn test_malformed_tokens() {
        let now = Utc::now();
        for bad in ["abc", "a.b", "a.b.c.d", "!!!.e30.sig", "e30.bm90IGpzb24.sig"] {
            let err = decode_token(bad, now).unwrap_err();
            assert_eq!(err.to_string(), INVALID_TOKEN, "{bad}");
        }
    }

    #[test]
    fn test_blank_token() {
        let output = JwtDecodeTool::transform(&JwtDecodeParams {
            token: " ".to_string(),
        })
        .unwrap();
        assert_eq!(output, JwtDecodeOutput::default());
    }
}
