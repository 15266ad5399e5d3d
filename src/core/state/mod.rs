//! Shared tool state machinery.
//!
//! Every tool runs through the same small pipeline:
//!
//! - `storage` - namespaced, write-through persistence of tool inputs
//! - `tool_state` - the `{data, is_loading, error, success}` container
//! - `debounce` - coalescing of rapid live edits into one transform
//! - `notifications` - transient, auto-expiring messages shared by all tools
//!
//! None of these are globals: they are owned by [`crate::core::ToolContext`]
//! and handed to the tools that need them.

mod debounce;
mod notifications;
mod storage;
mod tool_state;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use debounce::Debouncer;
pub use notifications::{Notification, NotificationCenter, NotificationKind};
pub use storage::{
    PersistedStore, PersistedValue, STORAGE_NAMESPACE, StorageError, storage_key,
};
pub use tool_state::{ToolState, ToolStateHandle};

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
