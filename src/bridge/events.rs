//! Listener registry for the bridge's global event streams.
//!
//! Each stream carries events for every session; listeners filter by id.
//! Registration returns a [`Subscription`] guard. Dropping the guard (or
//! calling [`Subscription::unsubscribe`]) removes the listener before it
//! returns, so a torn-down pane can never observe a later event.
//!
//! Listeners run on the emitting thread while the hub is read-locked. They
//! must not subscribe or unsubscribe on the same hub from inside a callback.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::session::SessionId;

/// Output chunk read from a session's PTY.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtyData {
    /// Session that produced the output.
    pub session: SessionId,
    /// Raw bytes, in the order the backend produced them.
    pub chunk: Vec<u8>,
}

/// A session's process exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtyExit {
    /// Session whose process exited.
    pub session: SessionId,
    /// Process exit code (-1 when unknown).
    pub code: i32,
}

/// Foreground activity changed for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtyStatus {
    /// Session whose status changed.
    pub session: SessionId,
    /// True while the backend runs foreground work.
    pub busy: bool,
}

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct HubInner<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// Fan-out point for one event stream.
pub struct EventHub<T> {
    inner: Arc<RwLock<HubInner<T>>>,
}

impl<T: 'static> EventHub<T> {
    /// Creates a hub with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HubInner {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Registers a listener for every future event.
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.write();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Arc::new(listener)));
            id
        };

        let weak: Weak<RwLock<HubInner<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.write().listeners.retain(|(lid, _)| *lid != id);
                }
            })),
        }
    }

    /// Delivers `event` to every listener on the calling thread.
    pub fn emit(&self, event: &T) {
        let inner = self.inner.read();
        for (_, listener) in &inner.listeners {
            listener(event);
        }
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.read().listeners.len()
    }
}

impl<T: 'static> Default for EventHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard for a registered listener.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Removes the listener now.
    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
