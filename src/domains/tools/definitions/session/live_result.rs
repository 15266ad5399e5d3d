//! Live result tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::ToolContext;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    error_result, parse_arguments, structured_result,
};
use crate::domains::tools::registry::ToolRegistry;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LiveResultParams {
    /// Name of the tool to inspect.
    pub tool: String,
}

/// A tool's state plus the input it was last given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LiveResultOutput {
    pub tool: String,
    pub data: Value,
    pub is_loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    /// Whether a debounced run is still waiting.
    pub pending: bool,
    pub input: Option<Value>,
}

impl LiveResultOutput {
    /// Snapshot `tool` from `ctx`.
    pub fn capture(tool: &str, ctx: &ToolContext) -> Self {
        let state = ctx.tool_state(tool).snapshot();
        Self {
            tool: tool.to_string(),
            data: state.data,
            is_loading: state.is_loading,
            error: state.error,
            success: state.success,
            pending: ctx.live_pending(tool),
            input: ctx.persisted_input(tool),
        }
    }
}

pub struct LiveResultTool;

impl LiveResultTool {
    pub const NAME: &'static str = "live_result";
    pub const DESCRIPTION: &'static str = "Read a tool's current state (data, loading flag, error, success message) and its last saved input.";

    pub fn execute(params: &LiveResultParams, ctx: &ToolContext) -> CallToolResult {
        if !ToolRegistry::is_live_tool(&params.tool) {
            return error_result(&ToolError::not_found(&params.tool).to_string());
        }

        let output = LiveResultOutput::capture(&params.tool, ctx);
        let summary = match (&output.error, output.is_loading || output.pending) {
            (Some(error), _) => format!("{}: {}", params.tool, error),
            (None, true) => format!("{}: working", params.tool),
            (None, false) => format!("{}: {}", params.tool, output.data),
        };
        structured_result(summary, &output)
    }

    pub fn call(arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let params: LiveResultParams = parse_arguments(arguments)?;
        Ok(Self::execute(&params, ctx))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<LiveResultParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<LiveResultOutput>().into()),
            icons: None,
            meta: None,
            title: Some("Live Result".into()),
        }
    }

    pub fn create_route<S>(ctx: ToolContext) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |call: ToolCallContext<'_, S>| {
            let args = call.arguments.clone().unwrap_or_default();
            let ctx = ctx.clone();
            async move {
                let params: LiveResultParams = serde_json::from_value(Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &ctx))
            }
            .boxed()
        })
    }
}
