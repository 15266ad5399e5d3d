//! Active notifications resource definition.

use super::{ResourceDefinition, to_json};
use crate::core::ToolContext;
use crate::domains::resources::ResourceError;

pub struct NotificationsResource;

impl ResourceDefinition for NotificationsResource {
    const URI: &'static str = "devkit://notifications";
    const NAME: &'static str = "Notifications";
    const DESCRIPTION: &'static str = "Notifications that have not expired or been dismissed, oldest first";
    const MIME_TYPE: &'static str = "application/json";

    fn read(ctx: &ToolContext) -> Result<String, ResourceError> {
        to_json(&ctx.notifications().list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_lists_notifications_with_type_field() {
        let ctx = ToolContext::in_memory();
        ctx.notifications().error("Invalid JWT token");

        let text = NotificationsResource::read(&ctx).unwrap();
        let list: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(list[0]["type"], "error");
        assert_eq!(list[0]["message"], "Invalid JWT token");
    }
}
