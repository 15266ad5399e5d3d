//! YAML <-> JSON conversion tool definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{TextOutput, TransformTool};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum YamlMode {
    #[default]
    YamlToJson,
    JsonToYaml,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct YamlConvertParams {
    /// YAML or JSON document, depending on `mode`.
    pub input: String,

    /// `yaml_to_json` (default) or `json_to_yaml`.
    #[serde(default)]
    pub mode: YamlMode,
}

pub struct YamlConvertTool;

impl TransformTool for YamlConvertTool {
    type Params = YamlConvertParams;
    type Output = TextOutput;

    const NAME: &'static str = "yaml_convert";
    const TITLE: &'static str = "YAML to JSON";
    const DESCRIPTION: &'static str = "Convert YAML to 2-space indented JSON, or JSON to YAML.";
    const SLUG: &'static str = "yaml";

    fn transform(params: &YamlConvertParams) -> Result<TextOutput, ToolError> {
        if params.input.trim().is_empty() {
            return Ok(TextOutput::empty());
        }
        match params.mode {
            YamlMode::YamlToJson => yaml_to_json(&params.input),
            YamlMode::JsonToYaml => json_to_yaml(&params.input),
        }
        .map(TextOutput::new)
    }

    fn summarize(output: &TextOutput) -> String {
        output.output.clone()
    }
}

pub fn yaml_to_json(input: &str) -> Result<String, ToolError> {
    let value: Value =
        serde_yaml::from_str(input).map_err(|e| ToolError::validation(e.to_string()))?;
    serde_json::to_string_pretty(&value).map_err(|e| ToolError::internal(e.to_string()))
}

pub fn json_to_yaml(input: &str) -> Result<String, ToolError> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| ToolError::validation(e.to_string()))?;
    serde_yaml::to_string(&value).map_err(|e| ToolError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_to_json() {
        let yaml = "name: devkit\ntags:\n  - json\n  - yaml\nnested:\n  enabled: true\n  count: 3\n";
        let json = yaml_to_json(yaml).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "devkit",
                "tags": ["json", "yaml"],
                "nested": {"enabled": true, "count": 3}
            })
        );
        assert!(json.contains("\n  \"name\""));
    }

    #[test]
    fn test_json_to_yaml_and_back() {
        let json = r#"{"a":1,"b":["x","y"],"c":{"d":null}}"#;
        let yaml = json_to_yaml(json).unwrap();
        assert!(yaml.contains("a: 1"));

        let back: Value = serde_json::from_str(&yaml_to_json(&yaml).unwrap()).unwrap();
        assert_eq!(back, serde_json::from_str::<Value>(json).unwrap());
    }

    #[test]
    fn test_invalid_input() {
        assert!(yaml_to_json("key: [unclosed").is_err());
        assert!(json_to_yaml("{not json}").is_err());
    }

    #[test]
    fn test_mode_deserializes_snake_case() {
        let params: YamlConvertParams =
            serde_json::from_value(serde_json::json!({"input": "{}", "mode": "json_to_yaml"}))
                .unwrap();
        assert_eq!(params.mode, YamlMode::JsonToYaml);
    }
}
