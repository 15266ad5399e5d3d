//! Resource Registry - central registration of all resources.
//!
//! This module provides dynamic resource registration without modifying service.rs.
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_resources()` or `get_all_resource_templates()`

use rmcp::model::{AnnotateAble, RawResource, RawResourceTemplate};

use super::definitions::{
    NotificationsResource, ResourceDefinition, ResourceTemplateDefinition, ServerInfoResource,
    StoredValueTemplate, ToolCatalogResource, ToolStateTemplate,
};
use super::service::{ResourceEntry, TemplateEntry};

/// Helper function to create an annotated resource from a definition.
fn build_resource<R: ResourceDefinition>() -> ResourceEntry {
    let mut raw = RawResource::new(R::URI, R::NAME);
    raw.description = Some(R::DESCRIPTION.to_string());
    raw.mime_type = Some(R::MIME_TYPE.to_string());

    ResourceEntry {
        resource: raw.no_annotation(),
        read: R::read,
    }
}

fn build_template<T: ResourceTemplateDefinition>() -> TemplateEntry {
    TemplateEntry {
        template: RawResourceTemplate {
            uri_template: T::URI_TEMPLATE.to_string(),
            name: T::NAME.to_string(),
            title: Some(T::TITLE.to_string()),
            description: Some(T::DESCRIPTION.to_string()),
            mime_type: Some(T::MIME_TYPE.to_string()),
        }
        .no_annotation(),
        matches: T::matches,
        read: T::read,
    }
}

/// Get all registered resources as ResourceEntries.
///
/// This is the central place where all resources are registered.
/// When adding a new resource, add it here.
pub fn get_all_resources() -> Vec<ResourceEntry> {
    vec![
        build_resource::<ServerInfoResource>(),
        build_resource::<ToolCatalogResource>(),
        build_resource::<NotificationsResource>(),
    ]
}

/// Get all registered resource templates.
///
/// Resource templates use URI templates (RFC 6570) to describe
/// parameterized resources that clients can fill in.
pub fn get_all_resource_templates() -> Vec<TemplateEntry> {
    vec![
        build_template::<ToolStateTemplate>(),
        build_template::<StoredValueTemplate>(),
    ]
}

/// Get the list of all resource URIs.
pub fn resource_uris() -> Vec<&'static str> {
    vec![
        ServerInfoResource::URI,
        ToolCatalogResource::URI,
        NotificationsResource::URI,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_all_resources() {
        let resources = get_all_resources();
        assert_eq!(resources.len(), 3);

        let uris: Vec<_> = resources
            .iter()
            .map(|r| r.resource.raw.uri.as_str())
            .collect();
        assert_eq!(uris, resource_uris());
    }

    #[test]
    fn test_get_all_resource_templates() {
        let templates = get_all_resource_templates();
        assert_eq!(templates.len(), 2);

        let uri_templates: Vec<_> = templates
            .iter()
            .map(|t| t.template.raw.uri_template.as_str())
            .collect();
        assert!(uri_templates.contains(&"devkit://tools/{tool}/state"));
        assert!(uri_templates.contains(&"devkit://storage/{key}"));
    }
}
