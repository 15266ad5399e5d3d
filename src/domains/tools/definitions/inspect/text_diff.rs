//! Text diff tool definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::TransformTool;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextDiffParams {
    /// Original text.
    pub original: String,
    /// Modified text.
    pub modified: String,
}

/// A run of lines that were kept, added or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiffPart {
    pub value: String,
    pub added: bool,
    pub removed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TextDiffOutput {
    pub parts: Vec<DiffPart>,
    /// Unified diff rendering.
    pub unified: String,
}

pub struct TextDiffTool;

impl TransformTool for TextDiffTool {
    type Params = TextDiffParams;
    type Output = TextDiffOutput;

    const NAME: &'static str = "text_diff";
    const TITLE: &'static str = "Text Diff";
    const DESCRIPTION: &'static str = "Compare two texts line by line and return the changed runs plus a unified diff.";
    const SLUG: &'static str = "diff";

    fn transform(params: &TextDiffParams) -> Result<TextDiffOutput, ToolError> {
        let diff = TextDiff::from_lines(&params.original, &params.modified);

        let mut parts: Vec<DiffPart> = Vec::new();
        for change in diff.iter_all_changes() {
            let added = change.tag() == ChangeTag::Insert;
            let removed = change.tag() == ChangeTag::Delete;
            match parts.last_mut() {
                Some(last) if last.added == added && last.removed == removed => {
                    last.value.push_str(change.value());
                }
                _ => parts.push(DiffPart {
                    value: change.value().to_string(),
                    added,
                    removed,
                }),
            }
        }

        let unified = diff
            .unified_diff()
            .context_radius(3)
            .header("original", "modified")
            .to_string();

        Ok(TextDiffOutput { parts, unified })
    }

    fn summarize(output: &TextDiffOutput) -> String {
        if output.parts.iter().all(|p| !p.added && !p.removed) {
            "No differences".to_string()
        } else {
            output.unified.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(original: &str, modified: &str) -> TextDiffOutput {
        TextDiffTool::transform(&TextDiffParams {
            original: original.to_string(),
            modified: modified.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_changed_line_is_removed_then_added() {
        let output = diff("a\nb\nc\n", "a\nB\nc\n");
        assert_eq!(
            output.parts,
            vec![
                DiffPart { value: "a\n".into(), added: false, removed: false },
                DiffPart { value: "b\n".into(), added: false, removed: true },
                DiffPart { value: "B\n".into(), added: true, removed: false },
                DiffPart { value: "c\n".into(), added: false, removed: false },
            ]
        );
        assert!(output.unified.contains("-b\n"));
        assert!(output.unified.contains("+B\n"));
    }

    #[test]
    fn test_consecutive_changes_are_merged() {
        let output = diff("", "x\ny\n");
        assert_eq!(output.parts.len(), 1);
        assert_eq!(output.parts[0].value, "x\ny\n");
        assert!(output.parts[0].added);
    }

    #[test]
    fn test_identical_texts() {
        let output = diff("same\n", "same\n");
        assert_eq!(output.parts.len(), 1);
        assert!(output.unified.is_empty());
        assert_eq!(TextDiffTool::summarize(&output), "No differences");
    }
}
