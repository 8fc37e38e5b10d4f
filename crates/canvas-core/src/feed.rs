//! Change feed
//!
//! Observer registry the session notifier publishes into. Every publish
//! bumps a revision counter and hands the new revision to each listener.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(u64) + Send + Sync>;

#[derive(Default)]
struct FeedInner {
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
    revision: AtomicU64,
    next_id: AtomicU64,
}

#[derive(Clone, Default)]
pub struct ChangeFeed {
    inner: Arc<FeedInner>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(u64) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.listeners.write().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.write();
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != id);
        listeners.len() != before
    }

    /// Bump the revision and notify every listener
    pub fn publish(&self) -> u64 {
        let revision = self.inner.revision.fetch_add(1, Ordering::SeqCst) + 1;

        // Listeners may subscribe from inside the callback, so don't hold the lock
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .read()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        tracing::trace!(revision, listeners = listeners.len(), "Publishing change");

        for listener in listeners {
            listener(revision);
        }

        revision
    }

    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.read().len()
    }
}

impl std::fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("revision", &self.revision())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
