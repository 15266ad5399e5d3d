//! Resource service implementation.
//!
//! The ResourceService manages resource discovery and access.
//! It maintains a registry of available resources and handles read requests.
//!
//! Resources are defined in `definitions/` and registered via `registry.rs`.
//! Adding a new resource does NOT require modifying this file.

use rmcp::model::{ReadResourceResult, Resource, ResourceContents, ResourceTemplate};
use std::collections::HashMap;
use tracing::{debug, info};

use super::error::ResourceError;
use super::registry::{get_all_resource_templates, get_all_resources};
use crate::core::ToolContext;

/// Renders a resource from the shared context.
pub type ResourceReader = fn(&ToolContext) -> Result<String, ResourceError>;

/// Renders a templated resource for one parameter value.
pub type TemplateReader = fn(&str, &ToolContext) -> Result<String, ResourceError>;

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    pub read: ResourceReader,
}

/// A parameterised resource.
#[derive(Debug, Clone)]
pub struct TemplateEntry {
    pub template: ResourceTemplate,

    /// Extracts the parameter from a concrete URI.
    pub matches: fn(&str) -> Option<String>,

    pub read: TemplateReader,
}

/// Service for managing and accessing resources.
///
/// This service maintains a registry of available resources and handles
/// resource listing and reading operations.
pub struct ResourceService {
    ctx: ToolContext,

    /// Registry of available resources.
    /// Key: resource URI, Value: resource metadata
    resources: HashMap<String, ResourceEntry>,

    /// Resource templates for parameterized resources.
    templates: Vec<TemplateEntry>,
}

impl ResourceService {
    /// Create a new ResourceService over the shared context.
    pub fn new(ctx: ToolContext) -> Self {
        info!("Initializing ResourceService");

        let mut service = Self {
            ctx,
            resources: HashMap::new(),
            templates: get_all_resource_templates(),
        };

        for entry in get_all_resources() {
            service.register_resource(entry);
        }

        service
    }

    /// Register a resource.
    pub fn register_resource(&mut self, entry: ResourceEntry) {
        debug!("Registering resource: {}", entry.resource.raw.uri);
        self.resources
            .insert(entry.resource.raw.uri.to_string(), entry);
    }

    /// List all available resources, sorted by URI.
    pub async fn list_resources(&self) -> Vec<Resource> {
        let mut resources: Vec<Resource> = self
            .resources
            .values()
            .map(|entry| entry.resource.clone())
            .collect();
        resources.sort_by(|a, b| a.raw.uri.cmp(&b.raw.uri));
        resources
    }

    /// List all available resource templates.
    pub async fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates
            .iter()
            .map(|entry| entry.template.clone())
            .collect()
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let (text, mime_type) = match self.resources.get(uri) {
            Some(entry) => (
                (entry.read)(&self.ctx)?,
                entry.resource.raw.mime_type.clone(),
            ),
            None => {
                let (entry, param) = self
                    .templates
                    .iter()
                    .find_map(|entry| (entry.matches)(uri).map(|param| (entry, param)))
                    .ok_or_else(|| ResourceError::not_found(uri))?;
                (
                    (entry.read)(&param, &self.ctx)?,
                    entry.template.raw.mime_type.clone(),
                )
            }
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type,
                text,
                meta: None,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(result: &ReadResourceResult) -> &str {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text,
            _ => panic!("Expected text content"),
        }
    }

    #[tokio::test]
    async fn test_resource_service_creation() {
        let service = ResourceService::new(ToolContext::in_memory());
        assert_eq!(service.list_resources().await.len(), 3);
        assert_eq!(service.list_resource_templates().await.len(), 2);
    }

    #[tokio::test]
    async fn test_read_fixed_and_templated_resources() {
        let ctx = ToolContext::in_memory();
        ctx.persist_input("sql_format", &serde_json::json!({"input": "select 1"}));
        let service = ResourceService::new(ctx);

        let catalog = service.read_resource("devkit://tools/catalog").await.unwrap();
        assert!(text_of(&catalog).contains("/tools/sql"));

        let state = service
            .read_resource("devkit://tools/sql_format/state")
            .await
            .unwrap();
        assert!(text_of(&state).contains("select 1"));

        let stored = service
            .read_resource("devkit://storage/code-mo:sql_format:input")
            .await
            .unwrap();
        assert!(text_of(&stored).contains("select 1"));
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let service = ResourceService::new(ToolContext::in_memory());
        let result = service.read_resource("devkit://nonexistent").await;
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }
}
