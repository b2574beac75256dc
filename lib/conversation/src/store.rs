//! Context storage.
//!
//! [`ContextStore`] is the seam the responders talk to; the in-memory
//! implementation is the only backing today. It never evicts.
//!
//! The store itself only guarantees that individual `get`/`put` calls are
//! atomic. A responder turn is a read-modify-write that may await a model
//! call in the middle, so turns for the same sender are serialized with
//! [`TurnLocks`]. Different senders never contend.

use crate::context::UserContext;
use crate::error::StoreError;
use async_trait::async_trait;
use pagechat_core::SenderId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Trait for per-sender context storage.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Gets the context for a sender, if one exists.
    async fn get(&self, sender: &SenderId) -> Result<Option<UserContext>, StoreError>;

    /// Stores (creates or replaces) the context for a sender.
    async fn put(&self, sender: &SenderId, context: UserContext) -> Result<(), StoreError>;

    /// Removes the context for a sender, returning what was stored.
    async fn delete(&self, sender: &SenderId) -> Result<Option<UserContext>, StoreError>;

    /// Returns the number of senders with stored context.
    async fn len(&self) -> Result<usize, StoreError>;

    /// Gets the context for a sender, or a fresh one for a new sender.
    async fn get_or_default(&self, sender: &SenderId) -> Result<UserContext, StoreError> {
        Ok(self.get(sender).await?.unwrap_or_default())
    }
}

/// Process-local context store.
#[derive(Debug, Default)]
pub struct InMemoryContextStore {
    contexts: RwLock<HashMap<SenderId, UserContext>>,
}

impl InMemoryContextStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContextStore for InMemoryContextStore {
    async fn get(&self, sender: &SenderId) -> Result<Option<UserContext>, StoreError> {
        Ok(self.contexts.read().await.get(sender).cloned())
    }

    async fn put(&self, sender: &SenderId, context: UserContext) -> Result<(), StoreError> {
        self.contexts.write().await.insert(sender.clone(), context);
        Ok(())
    }

    async fn delete(&self, sender: &SenderId) -> Result<Option<UserContext>, StoreError> {
        Ok(self.contexts.write().await.remove(sender))
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.contexts.read().await.len())
    }
}

/// Per-sender turn serialization.
///
/// Holding the guard returned by [`TurnLocks::acquire`] across a whole
/// read-modify-write turn ensures concurrent deliveries for the same sender
/// apply one after another instead of overwriting each other.
///
/// The table only keeps entries for senders with a turn in flight or
/// waiting; idle entries are dropped on the next `acquire`.
#[derive(Debug, Default)]
pub struct TurnLocks {
    locks: Mutex<HashMap<SenderId, Arc<Mutex<()>>>>,
}

impl TurnLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other turn for `sender` is in flight.
    pub async fn acquire(&self, sender: &SenderId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // The table holds one reference; anything above that is a live turn.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(sender.clone()).or_default())
        };
        tracing::trace!(sender = %sender, "waiting for turn lock");
        lock.lock_owned().await
    }
}
