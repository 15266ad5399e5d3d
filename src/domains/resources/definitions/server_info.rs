//! Server info resource definition.

use serde::Serialize;

use super::{ResourceDefinition, to_json};
use crate::core::ToolContext;
use crate::domains::resources::ResourceError;
use crate::domains::tools::ToolRegistry;

/// Server information resource (dynamic).
pub struct ServerInfoResource;

#[derive(Debug, Serialize)]
struct ServerInfo<'a> {
    name: &'a str,
    version: &'a str,
    transport: String,
    /// Backing file of the input store, or `memory`.
    storage: String,
    debounce_ms: u64,
    notification_ttl_ms: u64,
    tools: usize,
    prompt_builder: PromptBuilderInfo<'a>,
}

#[derive(Debug, Serialize)]
struct PromptBuilderInfo<'a> {
    enabled: bool,
    model: &'a str,
}

impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "devkit://server/info";
    const NAME: &'static str = "Server Information";
    const DESCRIPTION: &'static str = "Name, version, transport, storage and timing settings of this server";
    const MIME_TYPE: &'static str = "application/json";

    fn read(ctx: &ToolContext) -> Result<String, ResourceError> {
        let config = ctx.config();
        let storage = match ctx.store().path() {
            Some(path) => path.display().to_string(),
            None => "memory".to_string(),
        };

        to_json(&ServerInfo {
            name: &config.server.name,
            version: &config.server.version,
            transport: config.transport.description(),
            storage,
            debounce_ms: config.state.debounce_ms,
            notification_ttl_ms: config.state.notification_ttl_ms,
            tools: ToolRegistry::get_all_tools().len(),
            prompt_builder: PromptBuilderInfo {
                enabled: config.credentials.openrouter_api_key().is_some(),
                model: &config.prompt_builder.model,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_info_metadata() {
        assert_eq!(ServerInfoResource::URI, "devkit://server/info");
        assert_eq!(ServerInfoResource::MIME_TYPE, "application/json");
    }

    #[test]
    fn test_server_info_read() {
        let text = ServerInfoResource::read(&ToolContext::in_memory()).unwrap();
        let info: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(info["storage"], "memory");
        assert_eq!(info["debounce_ms"], 300);
        assert_eq!(info["prompt_builder"]["enabled"], false);
        assert!(!text.contains("api_key"));
    }
}
