//! Tool catalog resource definition.

use super::{ResourceDefinition, to_json};
use crate::core::ToolContext;
use crate::domains::resources::ResourceError;
use crate::domains::tools::ToolRegistry;

/// Every utility tool with its page route.
pub struct ToolCatalogResource;

impl ResourceDefinition for ToolCatalogResource {
    const URI: &'static str = "devkit://tools/catalog";
    const NAME: &'static str = "Tool Catalog";
    const DESCRIPTION: &'static str = "Utility tools with their titles, descriptions and /tools/<slug> routes";
    const MIME_TYPE: &'static str = "application/json";

    fn read(_ctx: &ToolContext) -> Result<String, ResourceError> {
        to_json(&ToolRegistry::catalog())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lists_routes() {
        let text = ToolCatalogResource::read(&ToolContext::in_memory()).unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(entries.len(), 19);
        assert!(
            entries
                .iter()
                .any(|e| e["name"] == "url_parse" && e["route"] == "/tools/url-parser")
        );
    }
}
