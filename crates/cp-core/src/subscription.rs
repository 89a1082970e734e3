//! Subscription handles
//!
//! Returned by anything that registers a listener. Cancelling is idempotent:
//! the first call runs the cancel action, later calls do nothing.

use std::fmt;

use parking_lot::Mutex;

type CancelFn = Box<dyn FnOnce() + Send>;

/// Handle for a registered listener
#[must_use = "dropping a Subscription does not cancel it; call `unsubscribe`"]
pub struct Subscription {
    cancel: Mutex<Option<CancelFn>>,
}

impl Subscription {
    /// Create a handle that runs `cancel` on the first `unsubscribe`
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    /// A handle with nothing to cancel
    pub fn inert() -> Self {
        Self {
            cancel: Mutex::new(None),
        }
    }

    /// Stop future deliveries. Safe to call any number of times.
    pub fn unsubscribe(&self) {
        // Take under the lock, run outside it: the cancel action may take
        // locks of its own.
        let cancel = self.cancel.lock().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    /// Whether `unsubscribe` has not been called yet
    pub fn is_active(&self) -> bool {
        self.cancel.lock().is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
