//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to domain-specific services.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Every tool receives a clone of the shared [`ToolContext`], so the state
//! containers, notifications and saved inputs seen over one transport are the
//! same ones the resources expose.
//!
//! The ToolRouter is built dynamically in `domains/tools/router.rs`.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::context::ToolContext;
use crate::domains::{
    prompts::PromptService,
    resources::ResourceService,
    tools::{ToolRegistry, build_tool_router},
};

const INSTRUCTIONS: &str = "Developer toolbox. Stateless transforms (json_format, base64, hash_generate, regex_test, cron_parse, text_diff and more) take their whole input as arguments and return structured output. \
Use live_input to queue debounced edits for a transform and live_result to read its state afterwards. \
prompt_build turns rough text into a structured prompt when an OpenRouter key is configured. \
Notifications, tool states and saved inputs are readable as devkit:// resources.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and coordinates
/// between different domain services to handle MCP protocol messages.
#[derive(Clone)]
pub struct McpServer {
    /// Shared tool context (configuration, state, notifications, store).
    ctx: ToolContext,

    /// Service for handling resource-related requests.
    resource_service: Arc<ResourceService>,

    /// Service for handling prompt-related requests.
    prompt_service: Arc<PromptService>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        Self::with_context(ToolContext::new(Arc::new(config)))
    }

    /// Create a server around an existing context.
    pub fn with_context(ctx: ToolContext) -> Self {
        let resource_service = Arc::new(ResourceService::new(ctx.clone()));
        let prompt_service = Arc::new(PromptService::new());

        Self {
            tool_router: build_tool_router::<Self>(ctx.clone()),
            ctx,
            resource_service,
            prompt_service,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config().server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config().server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        self.ctx.config()
    }

    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }

    pub fn instructions() -> &'static str {
        INSTRUCTIONS
    }

    /// Drop live edits still waiting for their quiet period.
    pub fn shutdown(&self) {
        let cancelled = self.ctx.cancel_live(None);
        info!("Server stopping, {} pending live edit(s) cancelled", cancelled);
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        to_json_list(self.tool_router.list_all())
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Tool failures come back as a result with `isError` set; only unknown
    /// tools and malformed arguments are reported as `Err`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let registry = ToolRegistry::new(self.ctx.clone());
        let result = registry
            .call_tool(name, arguments)
            .await
            .map_err(|e| e.to_string())?;
        serde_json::to_value(result).map_err(|e| e.to_string())
    }

    pub async fn list_resources(&self) -> Vec<serde_json::Value> {
        to_json_list(self.resource_service.list_resources().await)
    }

    pub async fn list_resource_templates(&self) -> Vec<serde_json::Value> {
        to_json_list(self.resource_service.list_resource_templates().await)
    }

    pub async fn read_resource(&self, uri: &str) -> Result<serde_json::Value, String> {
        let result = self
            .resource_service
            .read_resource(uri)
            .await
            .map_err(|e| e.to_string())?;
        serde_json::to_value(result).map_err(|e| e.to_string())
    }

    pub async fn list_prompts(&self) -> Vec<serde_json::Value> {
        to_json_list(self.prompt_service.list_prompts().await)
    }

    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, String> {
        let arguments = match arguments {
            Some(serde_json::Value::Object(map)) => Some(prompt_arguments(map)),
            _ => None,
        };
        let result = self
            .prompt_service
            .get_prompt(name, arguments)
            .await
            .map_err(|e| e.to_string())?;
        serde_json::to_value(result).map_err(|e| e.to_string())
    }
}

fn to_json_list<T: Serialize>(items: Vec<T>) -> Vec<serde_json::Value> {
    items
        .into_iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect()
}

/// Prompt arguments are strings; other JSON scalars are stringified and
/// nulls dropped.
fn prompt_arguments(map: serde_json::Map<String, serde_json::Value>) -> HashMap<String, String> {
    map.into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect()
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = self.resource_service.list_resources().await;
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        info!("Listing resource templates");
        let templates = self.resource_service.list_resource_templates().await;
        Ok(ListResourceTemplatesResult {
            resource_templates: templates,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .await
            .map_err(|e| McpError::resource_not_found(e.to_string(), None))
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        let prompts = self.prompt_service.list_prompts().await;
        Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        let arguments = request.arguments.map(prompt_arguments);
        self.prompt_service
            .get_prompt(&request.name, arguments)
            .await
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server() -> McpServer {
        McpServer::with_context(ToolContext::in_memory())
    }

    #[test]
    fn test_lists_every_registered_tool() {
        let server = server();
        let tools = server.list_tools();
        assert_eq!(tools.len(), server_tool_count());
        assert!(tools.iter().any(|t| t["name"] == "json_format"));
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    fn server_tool_count() -> usize {
        ToolRegistry::new(ToolContext::in_memory()).tool_names().len()
    }

    #[tokio::test]
    async fn test_call_tool_returns_serialized_result() {
        let server = server();
        let result = server
            .call_tool("base64", json!({"input": "hello", "mode": "encode"}))
            .await
            .unwrap();
        assert_eq!(result["structuredContent"]["output"], "aGVsbG8=");
        assert_ne!(result["isError"], json!(true));
    }

    #[tokio::test]
    async fn test_call_unknown_tool_is_an_error() {
        let err = server().call_tool("nope", json!({})).await.unwrap_err();
        assert!(err.contains("nope"));
    }

    #[tokio::test]
    async fn test_resources_share_the_tool_context() {
        let server = server();
        server.context().notifications().info("hello");

        let read = server
            .read_resource("devkit://notifications")
            .await
            .unwrap();
        let text = read["contents"][0]["text"].as_str().unwrap();
        assert!(text.contains("hello"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_live_edits() {
        let server = server();
        server
            .call_tool(
                "live_input",
                json!({"tool": "base64", "arguments": {"input": "hello"}}),
            )
            .await
            .unwrap();
        assert!(server.context().live_pending("base64"));

        server.shutdown();
        assert!(!server.context().live_pending("base64"));

        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        assert!(server.context().tool_state("base64").snapshot().data.is_null());
    }

    #[test]
    fn test_prompt_arguments_stringify_scalars() {
        let map = json!({"pattern": "a+", "count": 3, "skip": null});
        let serde_json::Value::Object(map) = map else {
            unreachable!()
        };
        let args = prompt_arguments(map);
        assert_eq!(args["pattern"], "a+");
        assert_eq!(args["count"], "3");
        assert!(!args.contains_key("skip"));
    }

    #[tokio::test]
    async fn test_get_prompt_over_http_shape() {
        let result = server()
            .get_prompt("explain_regex", Some(json!({"pattern": "a+"})))
            .await
            .unwrap();
        assert_eq!(result["messages"].as_array().unwrap().len(), 1);
    }
}
