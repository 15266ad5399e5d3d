//! Debounced transformer.
//!
//! Coalesces rapid calls into a single execution after a quiet period. There
//! is exactly one pending-call slot: every call cancels whatever is pending
//! and re-arms the timer with its own arguments.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::debug;

use super::lock;

type Action<A> = Arc<dyn Fn(A) + Send + Sync>;

#[derive(Default)]
struct PendingSlot {
    /// Incremented on every call and cancel. A timer only fires if the
    /// generation it was armed with is still current.
    generation: u64,
    handle: Option<AbortHandle>,
}

/// Rate limiter that runs its action once per burst of calls.
pub struct Debouncer<A> {
    delay: Duration,
    action: Action<A>,
    slot: Arc<Mutex<PendingSlot>>,
}

impl<A> Debouncer<A>
where
    A: Send + 'static,
{
    pub fn new<F>(delay: Duration, action: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            delay,
            action: Arc::new(action),
            slot: Arc::new(Mutex::new(PendingSlot::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule the action with `args`, superseding any pending call.
    ///
    /// Outside a Tokio runtime there is no timer to arm, so the action runs
    /// immediately.
    pub fn call(&self, args: A) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime available, running debounced action immediately");
            self.cancel();
            (self.action)(args);
            return;
        };

        let mut slot = lock(&self.slot);
        if let Some(pending) = slot.handle.take() {
            pending.abort();
        }
        slot.generation += 1;
        let generation = slot.generation;

        let delay = self.delay;
        let action = Arc::clone(&self.action);
        let shared_slot = Arc::clone(&self.slot);

        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut slot = lock(&shared_slot);
                if slot.generation != generation {
                    return;
                }
                slot.handle = None;
            }
            action(args);
        });

        slot.handle = Some(task.abort_handle());
    }

    /// Drop the pending call, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        match slot.handle.take() {
            Some(pending) => {
                pending.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).handle.is_some()
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        if let Some(pending) = slot.handle.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |value: String| sink.lock().unwrap().push(value))
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_calls_execute_once_with_last_arguments() {
        let (calls, action) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(300), action);

        for input in ["{", "{\"a\"", "{\"a\":", "{\"a\":1}"] {
            debouncer.call(input.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(calls.lock().unwrap().is_empty());
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(*calls.lock().unwrap(), vec!["{\"a\":1}".to_string()]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_execute_separately() {
        let (calls, action) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(300), action);

        debouncer.call("first".to_string());
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.call("second".to_string());
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["first".to_string(), "second".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_call() {
        let (calls, action) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(300), action);

        debouncer.call("never".to_string());
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_abandons_pending_call() {
        let (calls, action) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(300), action);

        debouncer.call("abandoned".to_string());
        drop(debouncer);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_without_runtime_runs_immediately() {
        let (calls, action) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(300), action);

        debouncer.call("now".to_string());
        assert_eq!(*calls.lock().unwrap(), vec!["now".to_string()]);
    }
}
