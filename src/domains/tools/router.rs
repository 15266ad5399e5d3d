//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own route.

use rmcp::handler::server::tool::ToolRouter;

use crate::core::ToolContext;

use super::definitions::{
    BackslashEscapeTool, Base64Tool, CaseConvertTool, CronParseTool, HashGenerateTool,
    HtmlEncodeTool, JsonEscapeTool, JsonFormatTool, JwtDecodeTool, LiveInputTool,
    LiveResultTool, MarkdownRenderTool, NotificationsTool, PhpSerializeTool, PromptBuildTool,
    RegexTestTool, SqlFormatTool, StorageClearTool, TextDiffTool, TransformTool, UrlEncodeTool,
    UrlParseTool, UuidGenerateTool, YamlConvertTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(ctx: ToolContext) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(PromptBuildTool::create_route(ctx.clone()))
        .with_route(JsonFormatTool::create_route(ctx.clone()))
        .with_route(SqlFormatTool::create_route(ctx.clone()))
        .with_route(YamlConvertTool::create_route(ctx.clone()))
        .with_route(Base64Tool::create_route(ctx.clone()))
        .with_route(UrlEncodeTool::create_route(ctx.clone()))
        .with_route(HtmlEncodeTool::create_route(ctx.clone()))
        .with_route(BackslashEscapeTool::create_route(ctx.clone()))
        .with_route(JsonEscapeTool::create_route(ctx.clone()))
        .with_route(PhpSerializeTool::create_route(ctx.clone()))
        .with_route(UuidGenerateTool::create_route(ctx.clone()))
        .with_route(HashGenerateTool::create_route(ctx.clone()))
        .with_route(JwtDecodeTool::create_route(ctx.clone()))
        .with_route(RegexTestTool::create_route(ctx.clone()))
        .with_route(CronParseTool::create_route(ctx.clone()))
        .with_route(UrlParseTool::create_route(ctx.clone()))
        .with_route(CaseConvertTool::create_route(ctx.clone()))
        .with_route(TextDiffTool::create_route(ctx.clone()))
        .with_route(MarkdownRenderTool::create_route(ctx.clone()))
        .with_route(LiveInputTool::create_route(ctx.clone()))
        .with_route(LiveResultTool::create_route(ctx.clone()))
        .with_route(NotificationsTool::create_route(ctx.clone()))
        .with_route(StorageClearTool::create_route(ctx))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(ToolContext::in_memory());
        let tools = router.list_all();
        assert_eq!(tools.len(), 23);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"prompt_build"));
        assert!(names.contains(&"json_format"));
        assert!(names.contains(&"live_input"));
        assert!(names.contains(&"storage_clear"));
    }

    #[test]
    fn test_registry_matches_router() {
        // Ensure registry and router have the same tools
        let ctx = ToolContext::in_memory();
        let registry = ToolRegistry::new(ctx.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(ctx);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
