//! Notifications tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::ToolContext;
use crate::core::state::Notification;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    error_result, parse_arguments, structured_result,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationAction {
    /// Show active notifications.
    #[default]
    List,
    /// Remove one notification by id.
    Dismiss,
    /// Remove every notification.
    Clear,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NotificationsParams {
    #[serde(default)]
    pub action: NotificationAction,

    /// Notification id, required for `dismiss`.
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NotificationsOutput {
    /// Notifications still active after the action, oldest first.
    pub notifications: Vec<NotificationView>,
    /// Whether `dismiss` found its notification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissed: Option<bool>,
}

/// Schema-friendly copy of a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NotificationView {
    pub id: String,
    /// `success`, `error` or `info`.
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl From<Notification> for NotificationView {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind.to_string(),
            message: notification.message,
        }
    }
}

pub struct NotificationsTool;

impl NotificationsTool {
    pub const NAME: &'static str = "notifications";
    pub const DESCRIPTION: &'static str = "List, dismiss or clear the transient notifications raised by tools. Notifications expire on their own after a few seconds.";

    pub fn execute(params: &NotificationsParams, ctx: &ToolContext) -> CallToolResult {
        let center = ctx.notifications();
        let dismissed = match params.action {
            NotificationAction::List => None,
            NotificationAction::Clear => {
                center.clear();
                None
            }
            NotificationAction::Dismiss => match params.id.as_deref() {
                Some(id) => Some(center.remove(id)),
                None => return error_result("An id is required to dismiss a notification"),
            },
        };

        let notifications: Vec<NotificationView> =
            center.list().into_iter().map(NotificationView::from).collect();
        let summary = if notifications.is_empty() {
            "No notifications".to_string()
        } else {
            notifications
                .iter()
                .map(|n| format!("[{}] {} ({})", n.kind, n.message, n.id))
                .collect::<Vec<_>>()
                .join("\n")
        };

        structured_result(
            summary,
            &NotificationsOutput {
                notifications,
                dismissed,
            },
        )
    }

    pub fn call(arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let params: NotificationsParams = parse_arguments(arguments)?;
        Ok(Self::execute(&params, ctx))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<NotificationsParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<NotificationsOutput>().into()),
            icons: None,
            meta: None,
            title: Some("Notifications".into()),
        }
    }

    pub fn create_route<S>(ctx: ToolContext) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |call: ToolCallContext<'_, S>| {
            let args = call.arguments.clone().unwrap_or_default();
            let ctx = ctx.clone();
            async move {
                let params: NotificationsParams = serde_json::from_value(Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &ctx))
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn output(result: CallToolResult) -> NotificationsOutput {
        serde_json::from_value(result.structured_content.unwrap()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_dismiss_clear() {
        let ctx = ToolContext::in_memory();
        let first = ctx.notifications().error("Invalid JSON");
        ctx.notifications().info("Saved");

        let listed = output(NotificationsTool::call(Value::Null, &ctx).unwrap());
        assert_eq!(listed.notifications.len(), 2);
        assert_eq!(listed.notifications[0].kind, "error");

        let dismissed = output(
            NotificationsTool::call(json!({"action": "dismiss", "id": first}), &ctx).unwrap(),
        );
        assert_eq!(dismissed.dismissed, Some(true));
        assert_eq!(dismissed.notifications.len(), 1);
        assert_eq!(dismissed.notifications[0].message, "Saved");

        let cleared = output(NotificationsTool::call(json!({"action": "clear"}), &ctx).unwrap());
        assert!(cleared.notifications.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_requires_id() {
        let ctx = ToolContext::in_memory();
        let result = NotificationsTool::call(json!({"action": "dismiss"}), &ctx).unwrap();
        assert_eq!(result.is_error, Some(true));

        let missing = output(
            NotificationsTool::call(json!({"action": "dismiss", "id": "0-0"}), &ctx).unwrap(),
        );
        assert_eq!(missing.dismissed, Some(false));
    }
}
