//! Resource definitions module.
//!
//! Every resource is computed from the shared [`ToolContext`] when read.
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement `ResourceDefinition` (fixed URI) or
//!    `ResourceTemplateDefinition` (parameterised URI)
//! 3. Export it here
//! 4. Register in `registry.rs`

mod notifications;
mod server_info;
mod stored_value;
mod tool_catalog;
mod tool_state;

use serde::Serialize;

use super::error::ResourceError;
use crate::core::ToolContext;

pub use notifications::NotificationsResource;
pub use server_info::ServerInfoResource;
pub use stored_value::StoredValueTemplate;
pub use tool_catalog::ToolCatalogResource;
pub use tool_state::ToolStateTemplate;

/// Trait for resources with a fixed URI.
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str;

    /// Render the current content.
    fn read(ctx: &ToolContext) -> Result<String, ResourceError>;
}

/// Trait for resources addressed through a URI template with a single
/// `{param}` placeholder.
pub trait ResourceTemplateDefinition {
    /// RFC 6570 template, e.g. `devkit://tools/{tool}/state`.
    const URI_TEMPLATE: &'static str;
    const NAME: &'static str;
    const TITLE: &'static str;
    const DESCRIPTION: &'static str;
    const MIME_TYPE: &'static str;

    /// Extract the parameter from `uri` when it fits the template.
    fn matches(uri: &str) -> Option<String> {
        let (prefix, rest) = Self::URI_TEMPLATE.split_once('{')?;
        let (_, suffix) = rest.split_once('}')?;
        let param = uri.strip_prefix(prefix)?.strip_suffix(suffix)?;
        (!param.is_empty()).then(|| param.to_string())
    }

    /// Render the content for `param`.
    fn read(param: &str, ctx: &ToolContext) -> Result<String, ResourceError>;
}

/// Pretty-printed JSON, the format of every resource here.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ResourceError> {
    Ok(serde_json::to_string_pretty(value)?)
}
