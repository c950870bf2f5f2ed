//! Bounded in-memory store for cookie sessions.
//!
//! Records live in a moka cache with the same idle timeout and capacity as
//! the checkout registry, so abandoned sessions are evicted instead of
//! piling up for the life of the process.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tower_sessions::SessionStore;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store;

use crate::services::checkouts::MAX_SESSIONS;

/// Session store backed by a moka cache.
#[derive(Clone)]
pub struct SessionCache {
    records: Cache<Id, Record>,
}

impl SessionCache {
    /// Create a store whose records are dropped after `idle` without access.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self::with_capacity(idle, MAX_SESSIONS)
    }

    fn with_capacity(idle: Duration, capacity: u64) -> Self {
        let records = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(idle)
            .build();
        Self { records }
    }

    /// Approximate number of stored sessions.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.records.entry_count()
    }

    /// Apply pending evictions now instead of on the next cache access.
    pub async fn run_pending_tasks(&self) {
        self.records.run_pending_tasks().await;
    }
}

impl fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCache")
            .field("entries", &self.records.entry_count())
            .finish()
    }
}

#[async_trait]
impl SessionStore for SessionCache {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.records.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let Some(record) = self.records.get(session_id).await else {
            return Ok(None);
        };
        if record.expiry_date > OffsetDateTime::now_utc() {
            Ok(Some(record))
        } else {
            self.records.invalidate(session_id).await;
            Ok(None)
        }
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.invalidate(session_id).await;
        Ok(())
    }
}
