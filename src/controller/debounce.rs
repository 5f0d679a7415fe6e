//! Trailing debounce on top of tokio timers.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs an action once a burst of calls has been quiet for a fixed delay.
///
/// At most one timer is live: scheduling again aborts the pending one.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` to run after `delay`, replacing any pending action.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Drops the pending action, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_into_last_action() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let mut debouncer = Debouncer::new();

        for value in ["a", "ac", "acme"] {
            let fired = Arc::clone(&fired);
            debouncer.schedule(Duration::from_millis(300), move || {
                fired.lock().unwrap().push(value);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(199)).await;
        assert!(fired.lock().unwrap().is_empty());
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*fired.lock().unwrap(), vec!["acme"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_action() {
        let fired = Arc::new(Mutex::new(false));
        let mut debouncer = Debouncer::new();

        let flag = Arc::clone(&fired);
        debouncer.schedule(Duration::from_millis(300), move || {
            *flag.lock().unwrap() = true;
        });
        debouncer.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(!*fired.lock().unwrap());
        assert!(!debouncer.is_pending());
    }
}
