//! Live input tool definition.
//!
//! Mirrors typing into a tool page: every call persists the arguments and
//! restarts the tool's debounce timer. Only the last call in a burst runs.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::core::ToolContext;
use crate::core::context::LiveCall;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    error_result, parse_arguments, structured_result,
};
use crate::domains::tools::registry::ToolRegistry;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LiveInputParams {
    /// Name of the tool being edited, e.g. `json_format`.
    pub tool: String,

    /// The tool's arguments as they currently stand.
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LiveInputOutput {
    pub tool: String,
    /// Always `queued`: the transform runs once the input settles.
    pub status: String,
    /// Quiet period before the transform runs.
    pub delay_ms: u64,
}

pub struct LiveInputTool;

impl LiveInputTool {
    pub const NAME: &'static str = "live_input";
    pub const DESCRIPTION: &'static str = "Send in-progress arguments for a tool. The input is saved at once and the tool runs after a short quiet period; read the outcome with live_result.";

    pub fn execute(params: &LiveInputParams, ctx: &ToolContext) -> CallToolResult {
        if !ToolRegistry::is_live_tool(&params.tool) {
            return error_result(&ToolError::not_found(&params.tool).to_string());
        }

        ctx.persist_input(&params.tool, &params.arguments);
        let debouncer = ctx.live_debouncer(&params.tool, ToolRegistry::run_live);
        debouncer.call(LiveCall {
            tool: params.tool.clone(),
            arguments: params.arguments.clone(),
            context: ctx.clone(),
        });
        debug!("Live input queued for {}", params.tool);

        let output = LiveInputOutput {
            tool: params.tool.clone(),
            status: "queued".to_string(),
            delay_ms: debouncer.delay().as_millis() as u64,
        };
        structured_result(format!("Queued {}", params.tool), &output)
    }

    pub fn call(arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        info!("{} called", Self::NAME);
        let params: LiveInputParams = parse_arguments(arguments)?;
        Ok(Self::execute(&params, ctx))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<LiveInputParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<LiveInputOutput>().into()),
            icons: None,
            meta: None,
            title: Some("Live Input".into()),
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
                let params: LiveInputParams = serde_json::from_value(Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &ctx))
            }
            .boxed()
        })
    }
}
