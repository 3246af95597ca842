use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::{debug, error};

/// Group name that makes `off_login` drop every queued callback.
pub const ALL_GROUPS: &str = "all";

/// A deferred callback, run at most once when login succeeds.
pub type LoginCallback = Box<dyn FnOnce() + Send + 'static>;

struct CallbackEntry {
    id: u64,
    group: String,
    callback: LoginCallback,
}

/// Ordered queue of callbacks waiting for the next successful login.
///
/// Insertion order is execution order. Each entry carries a group tag so
/// callers can cancel a batch of them at once.
#[derive(Default)]
pub struct CallbackRegistry {
    entries: Vec<CallbackEntry>,
    next_id: u64,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a callback and return the id that identifies this exact entry.
    pub fn push(&mut self, group: String, callback: LoginCallback) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(CallbackEntry {
            id,
            group,
            callback,
        });
        id
    }

    /// Remove the entry with `id`. Returns false if it already fired or was removed.
    pub fn remove(&mut self, id: u64) -> bool {
        match self.entries.iter().position(|entry| entry.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Drop every entry tagged with `group`, or everything for [`ALL_GROUPS`].
    /// Returns how many entries were removed.
    pub fn remove_group(&mut self, group: &str) -> usize {
        let before = self.entries.len();
        if group == ALL_GROUPS {
            self.entries.clear();
        } else {
            self.entries.retain(|entry| entry.group != group);
        }
        before - self.entries.len()
    }

    /// Empty the queue and hand back the callbacks in insertion order.
    pub fn take_all(&mut self) -> Vec<LoginCallback> {
        std::mem::take(&mut self.entries)
            .into_iter()
            .map(|entry| entry.callback)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn groups(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.group.clone()).collect()
    }
}

pub(crate) fn lock_registry(registry: &Mutex<CallbackRegistry>) -> MutexGuard<'_, CallbackRegistry> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Run drained callbacks in order. A panicking callback is logged and the
/// rest still run. Returns how many callbacks panicked.
pub fn run_callbacks(callbacks: Vec<LoginCallback>) -> usize {
    let total = callbacks.len();
    let mut failed = 0;
    for (index, callback) in callbacks.into_iter().enumerate() {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(callback)) {
            failed += 1;
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(
                callback_index = index,
                "login callback panicked: {}", reason
            );
        }
    }
    debug!(total, failed, "login callbacks drained");
    failed
}

/// Handle returned by `on_login`. Dropping it does nothing; call
/// [`LoginSubscription::unsubscribe`] to take the callback back out of the queue.
#[derive(Clone, Default)]
pub struct LoginSubscription {
    entry: Option<(Weak<Mutex<CallbackRegistry>>, u64)>,
}

impl LoginSubscription {
    /// A subscription with nothing behind it, for callbacks that were never queued.
    pub fn noop() -> Self {
        Self::default()
    }

    pub(crate) fn new(registry: &Arc<Mutex<CallbackRegistry>>, id: u64) -> Self {
        LoginSubscription {
            entry: Some((Arc::downgrade(registry), id)),
        }
    }

    /// Remove the callback if it is still queued. Safe to call any number of times.
    pub fn unsubscribe(&self) -> bool {
        let Some((registry, id)) = &self.entry else {
            return false;
        };
        match registry.upgrade() {
            Some(registry) => lock_registry(&registry).remove(*id),
            None => false,
        }
    }

    /// Whether the callback is still waiting in the queue.
    pub fn is_pending(&self) -> bool {
        match &self.entry {
            Some((registry, id)) => registry
                .upgrade()
                .map(|registry| lock_registry(&registry).contains(*id))
                .unwrap_or(false),
            None => false,
        }
    }
}
