//! In-memory registry of checkout sessions.
//!
//! Each browser session owns one [`CheckoutSession`], looked up by the UUID
//! stored in its cookie session. Entries expire after a period of inactivity
//! and nothing survives a restart.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use moka::notification::RemovalCause;
use tokio::sync::Mutex;
use tringl_core::CheckoutSession;
use uuid::Uuid;

/// A checkout session shared between request handlers and the order task.
pub type SharedCheckout = Arc<Mutex<CheckoutSession>>;

/// Upper bound on concurrently tracked shoppers.
pub const MAX_SESSIONS: u64 = 100_000;

/// Registry mapping checkout IDs to live sessions.
#[derive(Clone)]
pub struct CheckoutRegistry {
    sessions: Cache<Uuid, SharedCheckout>,
}

impl CheckoutRegistry {
    /// Create a registry whose entries expire after `idle` without access.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self::with_capacity(idle, MAX_SESSIONS)
    }

    fn with_capacity(idle: Duration, capacity: u64) -> Self {
        let sessions = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(idle)
            .eviction_listener(log_eviction)
            .build();
        Self { sessions }
    }

    /// Look up a session, starting an empty one if there is none.
    pub async fn get_or_create(&self, id: Uuid) -> SharedCheckout {
        self.sessions
            .get_with(id, async {
                tracing::debug!(checkout_id = %id, "Starting checkout session");
                Arc::new(Mutex::new(CheckoutSession::new()))
            })
            .await
    }
}

/// A live cart pushed out by the capacity bound is lost, along with the
/// outcome of any order still pending on it.
fn log_eviction(id: Arc<Uuid>, _checkout: SharedCheckout, cause: RemovalCause) {
    match cause {
        RemovalCause::Size => tracing::warn!(
            checkout_id = %id,
            "Checkout registry full, evicted a live session"
        ),
        RemovalCause::Expired => {
            tracing::debug!(checkout_id = %id, "Idle checkout session expired");
        }
        RemovalCause::Explicit | RemovalCause::Replaced => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tringl_core::{Catalog, ProductId};

    use super::*;

    #[tokio::test]
    async fn test_get_or_create_returns_same_session() {
        let registry = CheckoutRegistry::new(Duration::from_secs(60));
        let id = Uuid::new_v4();

        let first = registry.get_or_create(id).await;
        let catalog = Catalog::builtin();
        first
            .lock()
            .await
            .add_item(catalog.get(ProductId::new(1)).unwrap());

        let second = registry.get_or_create(id).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.lock().await.cart().line_count(), 1);
    }

    #[tokio::test]
    async fn test_capacity_evicts_sessions() {
        let registry = CheckoutRegistry::with_capacity(Duration::from_secs(60), 2);
        for _ in 0..10 {
            registry.get_or_create(Uuid::new_v4()).await;
        }
        registry.sessions.run_pending_tasks().await;
        assert!(registry.sessions.entry_count() <= 2);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = CheckoutRegistry::new(Duration::from_secs(60));
        let a = registry.get_or_create(Uuid::new_v4()).await;
        let b = registry.get_or_create(Uuid::new_v4()).await;
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
