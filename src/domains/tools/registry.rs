//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - Dispatch by name (HTTP transport, live edits)
//! - Tool metadata and the page catalog

use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::ToolContext;
use crate::core::context::LiveCall;

use super::ToolError;
use super::definitions::{
    BackslashEscapeTool, Base64Tool, CaseConvertTool, CatalogEntry, CronParseTool,
    HashGenerateTool, HtmlEncodeTool, JsonEscapeTool, JsonFormatTool, JwtDecodeTool,
    LiveInputTool, LiveResultTool, MarkdownRenderTool, NotificationsTool, PhpSerializeTool,
    PromptBuildTool, RegexTestTool, SqlFormatTool, StorageClearTool, TextDiffTool,
    TransformTool, UrlEncodeTool, UrlParseTool, UuidGenerateTool, YamlConvertTool,
};

// ============================================================================
// Transform table
// ============================================================================

/// Type-erased entry points of one synchronous transform tool.
struct TransformEntry {
    name: &'static str,
    tool: fn() -> Tool,
    catalog: fn() -> CatalogEntry,
    call: fn(Value, &ToolContext) -> Result<CallToolResult, ToolError>,
    run_live: fn(Value, &ToolContext),
}

fn entry<T: TransformTool>() -> TransformEntry {
    TransformEntry {
        name: T::NAME,
        tool: T::to_tool,
        catalog: T::catalog_entry,
        call: T::call,
        run_live: T::run_live,
    }
}

/// Every synchronous transform, in catalog order.
fn transforms() -> Vec<TransformEntry> {
    vec![
        entry::<JsonFormatTool>(),
        entry::<SqlFormatTool>(),
        entry::<YamlConvertTool>(),
        entry::<Base64Tool>(),
        entry::<UrlEncodeTool>(),
        entry::<HtmlEncodeTool>(),
        entry::<BackslashEscapeTool>(),
        entry::<JsonEscapeTool>(),
        entry::<PhpSerializeTool>(),
        entry::<UuidGenerateTool>(),
        entry::<HashGenerateTool>(),
        entry::<JwtDecodeTool>(),
        entry::<RegexTestTool>(),
        entry::<CronParseTool>(),
        entry::<UrlParseTool>(),
        entry::<CaseConvertTool>(),
        entry::<TextDiffTool>(),
        entry::<MarkdownRenderTool>(),
    ]
}

fn find_transform(name: &str) -> Option<TransformEntry> {
    transforms().into_iter().find(|entry| entry.name == name)
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching tool calls by name
pub struct ToolRegistry {
    ctx: ToolContext,
}

impl ToolRegistry {
    /// Create a new tool registry over a shared context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = vec![PromptBuildTool::NAME];
        names.extend(transforms().iter().map(|entry| entry.name));
        names.extend([
            LiveInputTool::NAME,
            LiveResultTool::NAME,
            NotificationsTool::NAME,
            StorageClearTool::NAME,
        ]);
        names
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Both HTTP and STDIO/TCP transports use this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        let mut tools = vec![PromptBuildTool::to_tool()];
        tools.extend(transforms().iter().map(|entry| (entry.tool)()));
        tools.extend([
            LiveInputTool::to_tool(),
            LiveResultTool::to_tool(),
            NotificationsTool::to_tool(),
            StorageClearTool::to_tool(),
        ]);
        tools
    }

    /// Page catalog of the utility tools, in sidebar order.
    pub fn catalog() -> Vec<CatalogEntry> {
        let mut catalog = vec![PromptBuildTool::catalog_entry()];
        catalog.extend(transforms().iter().map(|entry| (entry.catalog)()));
        catalog
    }

    /// Whether `name` is a utility tool that can be driven by live input.
    pub fn is_live_tool(name: &str) -> bool {
        name == PromptBuildTool::NAME || find_transform(name).is_some()
    }

    /// Dispatch a tool call to the appropriate handler.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<CallToolResult, ToolError> {
        let ctx = &self.ctx;
        match name {
            PromptBuildTool::NAME => PromptBuildTool::call(arguments, ctx).await,
            LiveInputTool::NAME => LiveInputTool::call(arguments, ctx),
            LiveResultTool::NAME => LiveResultTool::call(arguments, ctx),
            NotificationsTool::NAME => NotificationsTool::call(arguments, ctx),
            StorageClearTool::NAME => StorageClearTool::call(arguments, ctx),
            _ => match find_transform(name) {
                Some(entry) => (entry.call)(arguments, ctx),
                None => {
                    warn!("Unknown tool requested: {}", name);
                    Err(ToolError::not_found(name))
                }
            },
        }
    }

    /// Run a settled live edit. Used as the action of every live debouncer.
    pub fn run_live(call: LiveCall) {
        let LiveCall {
            tool,
            arguments,
            context,
        } = call;
        debug!("Running live transform for {}", tool);

        if tool == PromptBuildTool::NAME {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    runtime.spawn(PromptBuildTool::run_live(arguments, context));
                }
                Err(_) => warn!("No runtime available for {}", tool),
            }
            return;
        }

        match find_transform(&tool) {
            Some(entry) => (entry.run_live)(arguments, &context),
            None => warn!("Live input for unknown tool: {}", tool),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        ToolRegistry::new(ToolContext::in_memory())
    }

    #[test]
    fn test_registry_tool_names() {
        let names = registry().tool_names();
        assert_eq!(names.len(), 23);
        for name in [
            "prompt_build",
            "json_format",
            "sql_format",
            "yaml_convert",
            "base64",
            "url_encode",
            "html_encode",
            "backslash_escape",
            "json_escape",
            "php_serialize",
            "uuid_generate",
            "hash_generate",
            "jwt_decode",
            "regex_test",
            "cron_parse",
            "url_parse",
            "case_convert",
            "text_diff",
            "markdown_render",
            "live_input",
            "live_result",
            "notifications",
            "storage_clear",
        ] {
            assert!(names.contains(&name), "{name}");
        }
    }

    #[test]
    fn test_names_are_unique_and_match_metadata() {
        let names = registry().tool_names();
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());

        let tools = ToolRegistry::get_all_tools();
        let tool_names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(tool_names, names);
    }

    #[test]
    fn test_catalog_routes() {
        let catalog = ToolRegistry::catalog();
        assert_eq!(catalog.len(), 19);
        assert_eq!(catalog[0].route, "/tools/prompt-builder");

        let routes: Vec<&str> = catalog.iter().map(|e| e.route.as_str()).collect();
        for route in [
            "/tools/json",
            "/tools/json-escape",
            "/tools/escape",
            "/tools/url",
            "/tools/url-parser",
            "/tools/regexp",
            "/tools/diff",
            "/tools/markdown",
        ] {
            assert!(routes.contains(&route), "{route}");
        }
    }

    #[test]
    fn test_live_tools() {
        assert!(ToolRegistry::is_live_tool("json_format"));
        assert!(ToolRegistry::is_live_tool("prompt_build"));
        assert!(!ToolRegistry::is_live_tool("live_input"));
        assert!(!ToolRegistry::is_live_tool("unknown"));
    }

    #[tokio::test]
    async fn test_call_transform_by_name() {
        let registry = registry();
        let result = registry
            .call_tool("base64", json!({"input": "hello"}))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.structured_content.unwrap()["output"], "aGVsbG8=");

        let state = registry.context().tool_state("base64").snapshot();
        assert_eq!(state.success.as_deref(), Some("Base64 Encoder/Decoder updated"));
    }

    #[tokio::test]
    async fn test_call_unknown_and_bad_arguments() {
        let registry = registry();
        assert!(matches!(
            registry.call_tool("unknown", json!({})).await,
            Err(ToolError::NotFound(_))
        ));
        assert!(matches!(
            registry.call_tool("base64", json!({"input": 1})).await,
            Err(ToolError::InvalidArguments(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_transform_notifies() {
        let registry = registry();
        let result = registry
            .call_tool("json_format", json!({"input": "{oops"}))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(registry.context().notifications().list().len(), 1);
    }

    #[test]
    fn test_run_live_without_runtime() {
        let ctx = ToolContext::in_memory();
        ToolRegistry::run_live(LiveCall {
            tool: "case_convert".to_string(),
            arguments: json!({"input": "hello world"}),
            context: ctx.clone(),
        });
        assert_eq!(
            ctx.tool_state("case_convert").snapshot().data["snake"],
            "hello_world"
        );
    }
}
