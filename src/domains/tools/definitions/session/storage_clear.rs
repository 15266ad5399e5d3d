//! Storage clear tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::core::ToolContext;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    error_result, parse_arguments, structured_result,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StorageClearParams {
    /// Only clear this tool's saved input. Clears everything when omitted.
    #[serde(default)]
    pub tool: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StorageClearOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Number of stored keys removed.
    pub removed: usize,
    /// Number of pending live runs cancelled.
    pub cancelled: usize,
}

pub struct StorageClearTool;

impl StorageClearTool {
    pub const NAME: &'static str = "storage_clear";
    pub const DESCRIPTION: &'static str = "Forget saved tool inputs and reset tool state, for one tool or for all of them.";

    pub fn execute(params: &StorageClearParams, ctx: &ToolContext) -> CallToolResult {
        let tool = params.tool.as_deref().filter(|t| !t.trim().is_empty());
        let cancelled = ctx.cancel_live(tool);

        match ctx.clear_storage(tool) {
            Ok(removed) => {
                info!("Cleared {} stored key(s) for {}", removed, tool.unwrap_or("all tools"));
                let output = StorageClearOutput {
                    tool: tool.map(str::to_string),
                    removed,
                    cancelled,
                };
                structured_result(format!("Removed {removed} stored key(s)"), &output)
            }
            Err(e) => {
                warn!("Failed to clear storage: {}", e);
                ctx.notifications().error("Failed to clear storage");
                error_result(&e.to_string())
            }
        }
    }

    pub fn call(arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let params: StorageClearParams = parse_arguments(arguments)?;
        Ok(Self::execute(&params, ctx))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<StorageClearParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<StorageClearOutput>().into()),
            icons: None,
            meta: None,
            title: Some("Clear Storage".into()),
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
                let params: StorageClearParams = serde_json::from_value(Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &ctx))
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::PersistedStore;
    use crate::core::Config;
    use serde_json::json;
    use std::sync::Arc;

    fn output(result: CallToolResult) -> StorageClearOutput {
        serde_json::from_value(result.structured_content.unwrap()).unwrap()
    }

    #[test]
    fn test_clear_one_tool_then_all() {
        let ctx = ToolContext::in_memory();
        ctx.persist_input("base64", &json!({"input": "a"}));
        ctx.persist_input("sql_format", &json!({"input": "select 1"}));

        let one = output(StorageClearTool::call(json!({"tool": "base64"}), &ctx).unwrap());
        assert_eq!(one.removed, 1);
        assert_eq!(one.tool.as_deref(), Some("base64"));
        assert!(ctx.persisted_input("sql_format").is_some());

        let all = output(StorageClearTool::call(json!({}), &ctx).unwrap());
        assert_eq!(all.removed, 1);
        assert!(ctx.store().keys().is_empty());
    }

    #[test]
    fn test_clear_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let ctx = ToolContext::with_store(
            Arc::new(Config::default()),
            PersistedStore::open(&path),
        );
        ctx.persist_input("json_format", &json!({"input": "{}"}));

        StorageClearTool::call(json!({}), &ctx).unwrap();
        let reopened = PersistedStore::open(&path);
        assert!(reopened.keys().is_empty());
    }
}
