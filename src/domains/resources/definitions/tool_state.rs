//! Per-tool state resource template.

use super::{ResourceTemplateDefinition, to_json};
use crate::core::ToolContext;
use crate::domains::resources::ResourceError;
use crate::domains::tools::ToolRegistry;
use crate::domains::tools::definitions::session::LiveResultOutput;

pub struct ToolStateTemplate;

impl ResourceTemplateDefinition for ToolStateTemplate {
    const URI_TEMPLATE: &'static str = "devkit://tools/{tool}/state";
    const NAME: &'static str = "Tool State";
    const TITLE: &'static str = "Current Tool State";
    const DESCRIPTION: &'static str = "Data, loading flag, error, success message and saved input of a tool";
    const MIME_TYPE: &'static str = "application/json";

    fn read(tool: &str, ctx: &ToolContext) -> Result<String, ResourceError> {
        if !ToolRegistry::is_live_tool(tool) {
            return Err(ResourceError::not_found(format!("devkit://tools/{tool}/state")));
        }
        to_json(&LiveResultOutput::capture(tool, ctx))
    }
}
