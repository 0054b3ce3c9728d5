//! URC dispatch: routing unsolicited lines to registered handlers.
//!
//! Handlers are keyed by the text before the first colon of a line
//! (`+CREG: 1` routes on `+CREG`). Dispatch runs the handler synchronously on
//! the line-delivery thread: a slow or blocking handler stalls further line
//! delivery. That is a documented hazard, not a bug — handlers must be fast
//! or hand work off themselves.

use crate::classify::prefix_of;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// A registered notification handler, invoked with the full line.
pub type UrcHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Registry mapping line prefixes to handlers.
///
/// The registry has its own lock, independent of the exchange monitor:
/// dispatch only ever happens when no command is outstanding.
#[derive(Default)]
pub struct UrcRegistry {
    handlers: Mutex<HashMap<String, UrcHandler>>,
}

impl UrcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for lines whose prefix is `prefix`, replacing any
    /// previous handler for that prefix.
    pub fn register(
        &self,
        prefix: impl Into<String>,
        handler: impl Fn(&str) + Send + Sync + 'static,
    ) {
        self.lock().insert(prefix.into(), Arc::new(handler));
    }

    /// Remove the handler for `prefix`. Removing an unknown prefix is a no-op.
    pub fn unregister(&self, prefix: &str) {
        self.lock().remove(prefix);
    }

    /// Route an unsolicited line to its handler, or log it as unhandled.
    ///
    /// The handler is cloned out of the lock before it runs, so a handler may
    /// register or unregister without deadlocking.
    pub fn dispatch(&self, line: &str) {
        if let Some(prefix) = prefix_of(line) {
            let handler = self.lock().get(prefix).cloned();
            if let Some(handler) = handler {
                handler(line);
                return;
            }
        }
        warn!("Unhandled line: {}", line);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, UrcHandler>> {
        // The map is always valid: mutations are single inserts/removes.
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for UrcRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefixes: Vec<String> = self.lock().keys().cloned().collect();
        f.debug_struct("UrcRegistry").field("prefixes", &prefixes).finish()
    }
}
