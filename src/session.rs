//! Session invalidation signal
//!
//! When a token refresh fails the session is over: the client clears the
//! credential store and notifies the application through this registry so
//! it can react (route to authentication, drop in-memory user state). The
//! notification is fire-and-forget; the original caller still receives the
//! error through the normal return path.

use std::sync::{Arc, RwLock};
use tracing::debug;

type Handler = Arc<dyn Fn() + Send + Sync>;

/// Registry of session-invalidation handlers.
///
/// The client fires the registered handlers at most once per failed
/// refresh. Handlers run inline on the calling task and should be cheap;
/// anything slow belongs behind a channel on the application side.
#[derive(Default)]
pub struct SessionEvents {
    handlers: RwLock<Vec<Handler>>,
}

impl SessionEvents {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler fired when the session is forcibly invalidated
    pub fn on_invalidated(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.handlers
            .write()
            .expect("session handlers poisoned")
            .push(Arc::new(handler));
    }

    /// Fire all registered handlers
    pub(crate) fn notify_invalidated(&self) {
        let handlers = self.handlers.read().expect("session handlers poisoned");
        debug!("Session invalidated, notifying {} handler(s)", handlers.len());
        for handler in handlers.iter() {
            handler();
        }
    }
}

impl std::fmt::Debug for SessionEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.handlers.read().map(|h| h.len()).unwrap_or(0);
        f.debug_struct("SessionEvents")
            .field("handlers", &count)
            .finish()
    }
}
