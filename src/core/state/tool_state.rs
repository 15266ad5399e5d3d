//! Tool state container.
//!
//! Holds the `load -> transform -> result or error` lifecycle of one tool.
//! All mutation goes through [`ToolStateHandle`]; readers take snapshots.

use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

use super::lock;

/// Default lifetime of a success message.
const DEFAULT_SUCCESS_TTL: Duration = Duration::from_secs(3);

/// Snapshot of a tool's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolState<T> {
    pub data: T,
    pub is_loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl<T> ToolState<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            is_loading: false,
            error: None,
            success: None,
        }
    }
}

struct Inner<T> {
    state: ToolState<T>,
    /// Bumped by every `set_success`; a pending auto-clear only fires if it
    /// still matches.
    success_generation: u64,
}

/// Shared handle to one tool's state. Clones refer to the same state.
pub struct ToolStateHandle<T> {
    inner: Arc<Mutex<Inner<T>>>,
    initial: Arc<T>,
    success_ttl: Duration,
}

impl<T> Clone for ToolStateHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            initial: Arc::clone(&self.initial),
            success_ttl: self.success_ttl,
        }
    }
}

impl<T> ToolStateHandle<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: ToolState::new(initial.clone()),
                success_generation: 0,
            })),
            initial: Arc::new(initial),
            success_ttl: DEFAULT_SUCCESS_TTL,
        }
    }

    /// Override how long success messages stay visible.
    pub fn with_success_ttl(mut self, ttl: Duration) -> Self {
        self.success_ttl = ttl;
        self
    }

    pub fn snapshot(&self) -> ToolState<T> {
        lock(&self.inner).state.clone()
    }

    pub fn set_data(&self, data: T) {
        lock(&self.inner).state.data = data;
    }

    pub fn start_loading(&self) {
        let mut inner = lock(&self.inner);
        inner.state.is_loading = true;
        inner.state.error = None;
    }

    /// Record a failure as its display string.
    pub fn set_error(&self, error: impl Display) {
        let mut inner = lock(&self.inner);
        inner.state.is_loading = false;
        inner.state.error = Some(error.to_string());
        inner.state.success = None;
    }

    /// Record a success message that clears itself after the success TTL
    /// unless a newer message replaced it first.
    pub fn set_success(&self, message: impl Into<String>) {
        let generation = {
            let mut inner = lock(&self.inner);
            inner.state.is_loading = false;
            inner.state.success = Some(message.into());
            inner.state.error = None;
            inner.success_generation += 1;
            inner.success_generation
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime available, success message will not auto-clear");
            return;
        };

        let inner = Arc::clone(&self.inner);
        let ttl = self.success_ttl;
        runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut inner = lock(&inner);
            if inner.success_generation == generation {
                inner.state.success = None;
            }
        });
    }

    pub fn clear_error(&self) {
        lock(&self.inner).state.error = None;
    }

    pub fn clear_success(&self) {
        let mut inner = lock(&self.inner);
        inner.state.success = None;
        inner.success_generation += 1;
    }

    /// Back to the initial data with every flag cleared.
    pub fn reset(&self) {
        let mut inner = lock(&self.inner);
        inner.state = ToolState::new((*self.initial).clone());
        inner.success_generation += 1;
    }

    /// Run a synchronous transform with loading and error bookkeeping.
    ///
    /// Errors and panics are recorded with [`set_error`](Self::set_error)
    /// and reported as `None`.
    pub fn process<R, E, F>(&self, f: F) -> Option<R>
    where
        E: Display,
        F: FnOnce() -> Result<R, E>,
    {
        self.start_loading();
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(f));
        self.finish(outcome)
    }

    /// Run an asynchronous transform with loading and error bookkeeping.
    ///
    /// `is_loading` is true while the future runs and false afterwards,
    /// whatever the outcome.
    pub async fn process_with_loading<R, E, Fut>(&self, fut: Fut) -> Option<R>
    where
        E: Display,
        Fut: Future<Output = Result<R, E>>,
    {
        self.start_loading();
        let outcome = AssertUnwindSafe(fut).catch_unwind().await;
        self.finish(outcome)
    }

    fn finish<R, E: Display>(
        &self,
        outcome: Result<Result<R, E>, Box<dyn Any + Send>>,
    ) -> Option<R> {
        let result = match outcome {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                self.set_error(e);
                None
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("Transform panicked: {}", message);
                self.set_error(format!("Unexpected error: {message}"));
                None
            }
        };

        lock(&self.inner).state.is_loading = false;
        result
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "An unknown error occurred".to_string()
    }
}
