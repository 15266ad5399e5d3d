//! Shared runtime context handed to every tool.
//!
//! Owns the configuration, the persisted input store, the notification
//! center, one state container per tool and one live-edit debouncer per
//! tool. Cloning is cheap; clones share everything.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

use super::config::Config;
use super::state::{
    Debouncer, NotificationCenter, PersistedStore, ToolStateHandle, lock, storage_key,
};

/// Sub key under which a tool's last arguments are stored.
pub const INPUT_SUB_KEY: &str = "input";

/// One pending live transform: which tool to run and with what.
#[derive(Debug, Clone)]
pub struct LiveCall {
    pub tool: String,
    pub arguments: Value,
    pub context: ToolContext,
}

pub type LiveDebouncer = Debouncer<LiveCall>;

#[derive(Clone)]
pub struct ToolContext {
    config: Arc<Config>,
    store: PersistedStore,
    notifications: NotificationCenter,
    states: Arc<Mutex<HashMap<String, ToolStateHandle<Value>>>>,
    live: Arc<Mutex<HashMap<String, Arc<LiveDebouncer>>>>,
}

impl ToolContext {
    /// Build a context from configuration, opening the configured store.
    pub fn new(config: Arc<Config>) -> Self {
        let store = PersistedStore::from_config(&config.storage);
        Self::with_store(config, store)
    }

    pub fn with_store(config: Arc<Config>, store: PersistedStore) -> Self {
        let notifications = NotificationCenter::new(config.state.notification_ttl());
        Self {
            config,
            store,
            notifications,
            states: Arc::new(Mutex::new(HashMap::new())),
            live: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// In-memory context with default configuration.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(Config::default()), PersistedStore::in_memory())
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn store(&self) -> &PersistedStore {
        &self.store
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// The state container of `tool`, created empty on first use.
    pub fn tool_state(&self, tool: &str) -> ToolStateHandle<Value> {
        lock(&self.states)
            .entry(tool.to_string())
            .or_insert_with(|| {
                ToolStateHandle::new(Value::Null).with_success_ttl(self.config.state.success_ttl())
            })
            .clone()
    }

    /// State container of `tool` if it has been used.
    pub fn existing_tool_state(&self, tool: &str) -> Option<ToolStateHandle<Value>> {
        lock(&self.states).get(tool).cloned()
    }

    /// Names of tools that have a state container, sorted.
    pub fn active_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.states).keys().cloned().collect();
        names.sort();
        names
    }

    /// The live debouncer of `tool`, created with `action` on first use.
    pub fn live_debouncer<F>(&self, tool: &str, action: F) -> Arc<LiveDebouncer>
    where
        F: Fn(LiveCall) + Send + Sync + 'static,
    {
        let delay = self.config.state.debounce();
        Arc::clone(
            lock(&self.live)
                .entry(tool.to_string())
                .or_insert_with(|| Arc::new(Debouncer::new(delay, action))),
        )
    }

    /// Whether a live transform of `tool` is waiting to run.
    pub fn live_pending(&self, tool: &str) -> bool {
        lock(&self.live)
            .get(tool)
            .is_some_and(|debouncer| debouncer.is_pending())
    }

    /// Cancel pending live transforms for `tool`, or for every tool.
    /// Returns how many were pending.
    pub fn cancel_live(&self, tool: Option<&str>) -> usize {
        let live = lock(&self.live);
        live.iter()
            .filter(|(name, _)| tool.is_none_or(|t| t == name.as_str()))
            .filter(|(_, debouncer)| debouncer.cancel())
            .count()
    }

    /// Write a tool's arguments through to `code-mo:<tool>:input`.
    ///
    /// A failed write is logged and surfaced as an error notification;
    /// the caller carries on regardless.
    pub fn persist_input<T: Serialize + ?Sized>(&self, tool: &str, arguments: &T) {
        let key = storage_key(tool, Some(INPUT_SUB_KEY));
        if let Err(e) = self.store.save(&key, arguments) {
            warn!("Failed to persist input for {}: {}", tool, e);
            self.notifications
                .error(format!("Failed to save input for {tool}"));
        }
    }

    /// Last persisted arguments of `tool`.
    pub fn persisted_input(&self, tool: &str) -> Option<Value> {
        self.store.get_raw(&storage_key(tool, Some(INPUT_SUB_KEY)))
    }

    /// Drop a tool's persisted keys and reset its state, or everything.
    /// Returns the number of keys removed.
    pub fn clear_storage(&self, tool: Option<&str>) -> Result<usize, super::state::StorageError> {
        match tool {
            Some(tool) => {
                let removed = self.store.remove_tool(tool)?;
                if let Some(state) = self.existing_tool_state(tool) {
                    state.reset();
                }
                Ok(removed)
            }
            None => {
                let removed = self.store.keys().len();
                self.store.clear()?;
                for state in lock(&self.states).values() {
                    state.reset();
                }
                Ok(removed)
            }
        }
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("store", &self.store)
            .field("notifications", &self.notifications)
            .field("tools", &self.active_tools())
            .finish()
    }
}
