//! Session tools: live editing, notifications and saved input.
//!
//! These expose the shared [`ToolContext`](crate::core::ToolContext) rather
//! than transform any text themselves.

mod live_input;
mod live_result;
mod notifications;
mod storage_clear;

pub use live_input::{LiveInputOutput, LiveInputParams, LiveInputTool};
pub use live_result::{LiveResultOutput, LiveResultParams, LiveResultTool};
pub use notifications::{
    NotificationAction, NotificationView, NotificationsOutput, NotificationsParams,
    NotificationsTool,
};
pub use storage_clear::{StorageClearOutput, StorageClearParams, StorageClearTool};
