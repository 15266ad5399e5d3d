//! Hash generator tool definition.

use md5::Md5;
use ripemd::Ripemd160;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::TransformTool;

/// Supported algorithm names, matched exactly.
pub const ALGORITHMS: [&str; 5] = ["MD5", "SHA1", "SHA256", "SHA512", "RIPEMD160"];

fn default_algorithm() -> String {
    ALGORITHMS[0].to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HashGenerateParams {
    /// Text to hash (as UTF-8).
    pub input: String,

    /// One of MD5 (default), SHA1, SHA256, SHA512, RIPEMD160. Case-sensitive.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HashGenerateOutput {
    pub algorithm: String,
    /// Lowercase hexadecimal digest (empty for blank input).
    pub hash: String,
}

pub struct HashGenerateTool;

impl TransformTool for HashGenerateTool {
    type Params = HashGenerateParams;
    type Output = HashGenerateOutput;

    const NAME: &'static str = "hash_generate";
    const TITLE: &'static str = "Hash Generator";
    const DESCRIPTION: &'static str = "Compute the MD5, SHA1, SHA256, SHA512 or RIPEMD160 digest of text as lowercase hex.";
    const SLUG: &'static str = "hash";

    fn transform(params: &HashGenerateParams) -> Result<HashGenerateOutput, ToolError> {
        let algorithm = params.algorithm.as_str();
        if !ALGORITHMS.contains(&algorithm) {
            return Err(ToolError::validation(format!(
                "Unsupported algorithm '{}'. Supported: {}",
                algorithm,
                ALGORITHMS.join(", ")
            )));
        }

        let hash = if params.input.trim().is_empty() {
            String::new()
        } else {
            digest_hex(algorithm, &params.input).unwrap_or_default()
        };

        Ok(HashGenerateOutput {
            algorithm: algorithm.to_string(),
            hash,
        })
    }

    fn summarize(output: &HashGenerateOutput) -> String {
        format!("{}: {}", output.algorithm, output.hash)
    }
}

/// Hex digest of `input`, or `None` for an unknown algorithm.
pub fn digest_hex(algorithm: &str, input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let hash = match algorithm {
        "MD5" => hex_digest::<Md5>(bytes),
        "SHA1" => hex_digest::<Sha1>(bytes),
        "SHA256" => hex_digest::<Sha256>(bytes),
        "SHA512" => hex_digest::<Sha512>(bytes),
        "RIPEMD160" => hex_digest::<Ripemd160>(bytes),
        _ => return None,
    };
    Some(hash)
}

fn hex_digest<D: Digest>(bytes: &[u8]) -> String {
    hex::encode(D::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_digests_of_hello() {
        let cases = [
            ("MD5", "5d41402abc4b2a76b9719d911017c592"),
            ("SHA1", "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"),
            (
                "SHA256",
                "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
            ),
            (
                "SHA512",
                "9b71d224bd62f3785d96d46ad3ea3d73319bfbc2890caadae2dff72519673ca72323c3d99ba5c11d7c7acc6e14b8c5da0c4663475c2e5c3adef46f73bcdec043",
            ),
            ("RIPEMD160", "108f07b8382412612c048d07d13f814118445acd"),
        ];
        for (algorithm, expected) in cases {
            assert_eq!(digest_hex(algorithm, "hello").as_deref(), Some(expected), "{algorithm}");
        }
    }

    #[test]
    fn test_algorithm_name_is_case_sensitive() {
        let err = HashGenerateTool::transform(&HashGenerateParams {
            input: "hello".to_string(),
            algorithm: "sha256".to_string(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("MD5, SHA1, SHA256, SHA512, RIPEMD160"));
    }

    #[test]
    fn test_default_algorithm_and_blank_input() {
        let params: HashGenerateParams =
            serde_json::from_value(serde_json::json!({"input": "  "})).unwrap();
        assert_eq!(params.algorithm, "MD5");
        assert_eq!(HashGenerateTool::transform(&params).unwrap().hash, "");
    }
}
