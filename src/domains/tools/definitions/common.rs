//! Shared plumbing for transform tools.
//!
//! Every text utility is a pure `params -> output` transform. The
//! [`TransformTool`] trait supplies the rest: MCP metadata, input
//! persistence, state bookkeeping, error notifications and the rmcp route.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::ToolContext;
use crate::domains::tools::ToolError;

/// One entry of the tool catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    /// MCP tool name.
    pub name: String,
    /// Human-readable title.
    pub title: String,
    /// Page route, `/tools/<slug>`.
    pub route: String,
    pub description: String,
}

impl CatalogEntry {
    pub fn new(name: &str, title: &str, slug: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            route: format!("/tools/{slug}"),
            description: description.to_string(),
        }
    }
}

/// Direction of a two-way codec tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CodecMode {
    #[default]
    Encode,
    Decode,
}

/// Direction of an escaping tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EscapeMode {
    #[default]
    Escape,
    Unescape,
}

/// Output of the single-text tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TextOutput {
    pub output: String,
}

impl TextOutput {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(String::new())
    }
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with a text summary and structured content.
pub fn structured_result<T: Serialize>(summary: String, output: &T) -> CallToolResult {
    match serde_json::to_value(output) {
        Ok(value) => CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(value),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => error_result(&format!("Failed to serialize result: {e}")),
    }
}

/// Parse raw tool arguments into a params struct.
pub fn parse_arguments<P: DeserializeOwned>(arguments: Value) -> Result<P, ToolError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// A text utility: a pure transform plus its MCP surface.
pub trait TransformTool: Send + Sync + 'static {
    type Params: DeserializeOwned + Serialize + JsonSchema + Send + Sync + 'static;
    type Output: Serialize + JsonSchema + Send + 'static;

    /// Tool name as registered in MCP.
    const NAME: &'static str;
    const TITLE: &'static str;
    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;
    /// Page slug, served as `/tools/<slug>`.
    const SLUG: &'static str;

    fn transform(params: &Self::Params) -> Result<Self::Output, ToolError>;

    /// Short text rendering of the output.
    fn summarize(output: &Self::Output) -> String;

    /// Run the transform for a direct call.
    ///
    /// The arguments are persisted, the outcome is recorded in the tool
    /// state and failures also raise an error notification.
    fn execute(params: &Self::Params, ctx: &ToolContext) -> CallToolResult {
        info!("{} called", Self::NAME);
        ctx.persist_input(Self::NAME, params);

        match Self::apply(params, ctx) {
            Ok(output) => {
                ctx.tool_state(Self::NAME)
                    .set_success(format!("{} updated", Self::TITLE));
                structured_result(Self::summarize(&output), &output)
            }
            Err(message) => {
                ctx.notifications().error(message.clone());
                error_result(&message)
            }
        }
    }

    /// Run the transform through the tool state without persisting or
    /// notifying. Returns the output or the recorded error message.
    fn apply(params: &Self::Params, ctx: &ToolContext) -> Result<Self::Output, String> {
        let state = ctx.tool_state(Self::NAME);
        let Some(output) = state.process(|| Self::transform(params)) else {
            let message = state
                .snapshot()
                .error
                .unwrap_or_else(|| "An unknown error occurred".to_string());
            return Err(message);
        };

        match serde_json::to_value(&output) {
            Ok(value) => state.set_data(value),
            Err(e) => debug!("{} output not recorded: {}", Self::NAME, e),
        }
        Ok(output)
    }

    /// Entry point for dispatch by name.
    fn call(arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let params: Self::Params = parse_arguments(arguments)?;
        Ok(Self::execute(&params, ctx))
    }

    /// Entry point for debounced live edits.
    fn run_live(arguments: Value, ctx: &ToolContext) {
        match parse_arguments::<Self::Params>(arguments) {
            Ok(params) => {
                if let Err(message) = Self::apply(&params, ctx) {
                    ctx.notifications().error(message);
                }
            }
            Err(e) => {
                ctx.tool_state(Self::NAME).set_error(&e);
                ctx.notifications().error(e.to_string());
            }
        }
    }

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<Self::Params>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<Self::Output>().into()),
            icons: None,
            meta: None,
            title: Some(Self::TITLE.into()),
        }
    }

    fn catalog_entry() -> CatalogEntry {
        CatalogEntry::new(Self::NAME, Self::TITLE, Self::SLUG, Self::DESCRIPTION)
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    fn create_route<S>(ctx: ToolContext) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |call: ToolCallContext<'_, S>| {
            let args = call.arguments.clone().unwrap_or_default();
            let ctx = ctx.clone();
            async move {
                let params: Self::Params = serde_json::from_value(Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &ctx))
            }
            .boxed()
        })
    }
}

/// Text content of the first content block, for tests and summaries.
#[cfg(test)]
pub fn first_text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments_accepts_null() {
        #[derive(Deserialize)]
        struct Empty {
            #[serde(default)]
            flag: bool,
        }
        let parsed: Empty = parse_arguments(Value::Null).unwrap();
        assert!(!parsed.flag);
    }

    #[test]
    fn test_parse_arguments_reports_invalid_arguments() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            input: String,
        }
        let err = parse_arguments::<Needs>(serde_json::json!({"input": 3})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn test_catalog_entry_route() {
        let entry = CatalogEntry::new("json_format", "JSON Formatter", "json", "Format JSON");
        assert_eq!(entry.route, "/tools/json");
    }
}
