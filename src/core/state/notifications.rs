//! Notification center.
//!
//! A process-wide list of transient messages. Any tool may append to it
//! through the shared context; every entry removes itself after a fixed
//! delay unless it is dismissed first.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use super::lock;

/// Default lifetime of a notification.
const DEFAULT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Default)]
struct Inner {
    entries: Vec<Notification>,
    expiries: HashMap<String, AbortHandle>,
}

/// Shared, insertion-ordered notification list with auto-expiry.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Mutex<Inner>>,
    sequence: Arc<AtomicU64>,
    ttl: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            sequence: Arc::new(AtomicU64::new(0)),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Append a message and schedule its removal. Returns the new id.
    ///
    /// Duplicate messages are appended independently.
    pub fn add(&self, kind: NotificationKind, message: impl Into<String>) -> String {
        let id = self.next_id();
        let notification = Notification {
            id: id.clone(),
            kind,
            message: message.into(),
        };
        info!("Notification [{:?}] {}", kind, notification.message);

        let mut inner = lock(&self.inner);
        inner.entries.push(notification);

        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let center = self.clone();
            let expiring = id.clone();
            let ttl = self.ttl;
            let task = runtime.spawn(async move {
                tokio::time::sleep(ttl).await;
                center.expire(&expiring);
            });
            inner.expiries.insert(id.clone(), task.abort_handle());
        } else {
            debug!("No runtime available, notification {} will not expire", id);
        }

        id
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.add(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.add(NotificationKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.add(NotificationKind::Info, message)
    }

    /// Remove a notification now and cancel its pending expiry.
    /// Returns whether it was present.
    pub fn remove(&self, id: &str) -> bool {
        let mut inner = lock(&self.inner);
        if let Some(expiry) = inner.expiries.remove(id) {
            expiry.abort();
        }
        let before = inner.entries.len();
        inner.entries.retain(|n| n.id != id);
        inner.entries.len() != before
    }

    /// Remove everything and cancel all pending expiries.
    pub fn clear(&self) {
        let mut inner = lock(&self.inner);
        for (_, expiry) in inner.expiries.drain() {
            expiry.abort();
        }
        inner.entries.clear();
    }

    /// Current notifications in insertion order.
    pub fn list(&self) -> Vec<Notification> {
        lock(&self.inner).entries.clone()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner).entries.is_empty()
    }

    /// Called by the expiry timer; the handle is already finishing.
    fn expire(&self, id: &str) {
        let mut inner = lock(&self.inner);
        inner.expiries.remove(id);
        inner.entries.retain(|n| n.id != id);
        debug!("Notification {} expired", id);
    }

    /// Time-based id, made unique by a per-center sequence number.
    fn next_id(&self) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{millis}-{sequence}")
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("entries", &lock(&self.inner).entries)
            .field("ttl", &self.ttl)
            .finish()
    }
}
