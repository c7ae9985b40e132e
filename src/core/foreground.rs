//! App-foreground notifications.
//!
//! A notifier delivers a "became active" signal to subscribers. The returned
//! [`Subscription`] unsubscribes when dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Invoked each time the app returns to the foreground.
pub type Callback = Box<dyn Fn() + Send + Sync>;

/// Source of foreground-transition events.
pub trait ForegroundNotifier: Send + Sync {
    /// Register `callback`; it stays registered until the subscription drops.
    fn subscribe(&self, callback: Callback) -> Subscription;
}

/// Handle for a registered callback. Dropping it unsubscribes.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Subscription that runs `unsubscribe` when dropped.
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Subscription with nothing to release.
    #[must_use]
    pub fn inert() -> Self {
        Self { unsubscribe: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    callbacks: HashMap<u64, Arc<dyn Fn() + Send + Sync>>,
}

/// Notifier fired explicitly with [`ManualNotifier::notify`].
///
/// Embedders forward their platform's app-state events through it; tests
/// use it to simulate the user coming back. Clones share subscribers.
#[derive(Clone, Default)]
pub struct ManualNotifier {
    listeners: Arc<Mutex<Listeners>>,
}

impl ManualNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that the app became active.
    pub fn notify(&self) {
        // Call outside the lock so a callback may (un)subscribe.
        let callbacks: Vec<_> = {
            let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            listeners.callbacks.values().cloned().collect()
        };
        for callback in callbacks {
            (*callback)();
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .len()
    }
}

impl ForegroundNotifier for ManualNotifier {
    fn subscribe(&self, callback: Callback) -> Subscription {
        let id = {
            let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.callbacks.insert(id, Arc::from(callback));
            id
        };

        let listeners = Arc::clone(&self.listeners);
        Subscription::new(move || {
            listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .callbacks
                .remove(&id);
        })
    }
}

impl fmt::Debug for ManualNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Treats `SIGCONT` as the app returning to the foreground.
///
/// A terminal sends `SIGCONT` when a suspended job is resumed with `fg`. On
/// platforms without it, or outside a tokio runtime, subscriptions are inert.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalNotifier;

impl ForegroundNotifier for SignalNotifier {
    #[cfg(unix)]
    fn subscribe(&self, callback: Callback) -> Subscription {
        use tokio::runtime::Handle;
        use tokio::signal::unix::{SignalKind, signal};
        use tracing::warn;

        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime; foreground signal not observed");
            return Subscription::inert();
        };

        let _guard = runtime.enter();
        let mut resumed = match signal(SignalKind::from_raw(libc::SIGCONT)) {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGCONT");
                return Subscription::inert();
            }
        };

        let task = runtime.spawn(async move {
            while resumed.recv().await.is_some() {
                debug!("Process resumed");
                callback();
            }
        });
        Subscription::new(move || task.abort())
    }

    #[cfg(not(unix))]
    fn subscribe(&self, _callback: Callback) -> Subscription {
        debug!("Foreground signal unsupported on this platform");
        Subscription::inert()
    }
}
