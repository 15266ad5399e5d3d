//! UUID / ULID generator tool definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use uuid::Uuid;

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::TransformTool;

pub const MAX_COUNT: usize = 100;

/// Identifier flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    /// Random UUID, version 4.
    #[default]
    Uuid,
    /// Lexicographically sortable identifier (26 chars, Crockford base32).
    Ulid,
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UuidGenerateParams {
    #[serde(default)]
    pub kind: IdKind,

    /// How many identifiers to generate (1-100).
    #[serde(default = "default_count")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UuidGenerateOutput {
    pub kind: IdKind,
    pub ids: Vec<String>,
}

pub struct UuidGenerateTool;

impl TransformTool for UuidGenerateTool {
    type Params = UuidGenerateParams;
    type Output = UuidGenerateOutput;

    const NAME: &'static str = "uuid_generate";
    const TITLE: &'static str = "UUID Generator";
    const DESCRIPTION: &'static str = "Generate 1 to 100 random v4 UUIDs or ULIDs.";
    const SLUG: &'static str = "uuid";

    fn transform(params: &UuidGenerateParams) -> Result<UuidGenerateOutput, ToolError> {
        if !(1..=MAX_COUNT).contains(&params.count) {
            return Err(ToolError::validation(format!(
                "Count must be between 1 and {MAX_COUNT}"
            )));
        }

        let ids = (0..params.count)
            .map(|_| match params.kind {
                IdKind::Uuid => Uuid::new_v4().to_string(),
                IdKind::Ulid => Ulid::new().to_string(),
            })
            .collect();

        Ok(UuidGenerateOutput {
            kind: params.kind,
            ids,
        })
    }

    fn summarize(output: &UuidGenerateOutput) -> String {
        output.ids.join("\n")
    }
}
