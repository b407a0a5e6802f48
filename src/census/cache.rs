use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use super::{FetchError, StatSource};
use crate::core::StatRow;
use crate::db::SharedDatabase;

/// Wraps a source with an in-memory memo and an optional persistent SQLite tier.
/// A hit returns exactly the rows the original fetch produced.
pub struct CachedSource<S> {
    inner: S,
    db: Option<SharedDatabase>,
    dataset: String,
    ttl: Duration,
    memory: Mutex<HashMap<String, Vec<StatRow>>>,
}

impl<S: StatSource> CachedSource<S> {
    pub fn new(inner: S, db: Option<SharedDatabase>, dataset: impl Into<String>, ttl: Duration) -> Self {
        Self {
            inner,
            db,
            dataset: dataset.into(),
            ttl,
            memory: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Forget everything held in memory; persisted rows are kept.
    pub fn clear_memory(&self) {
        self.memory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn remember(&self, source_id: &str, rows: &[StatRow]) {
        self.memory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(source_id.to_string(), rows.to_vec());
    }

    /// Persisted rows and whether they are still within the TTL.
    fn load_persisted(&self, source_id: &str) -> Option<(Vec<StatRow>, bool)> {
        let db = self.db.as_ref()?;
        let cached = match db.cached_rows(source_id, &self.dataset) {
            Ok(Some(cached)) => cached,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read cached rows for {source_id}: {e}");
                return None;
            }
        };
        match serde_json::from_str::<Vec<StatRow>>(&cached.rows_json) {
            Ok(rows) => {
                let fresh = Utc::now() - cached.fetched_at < self.ttl;
                Some((rows, fresh))
            }
            Err(e) => {
                warn!("Discarding unreadable cached rows for {source_id}: {e}");
                None
            }
        }
    }

    fn persist(&self, source_id: &str, rows: &[StatRow]) {
        let Some(db) = &self.db else { return };
        let stored = serde_json::to_string(rows)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                db.store_rows(source_id, &self.dataset, &json)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = stored {
            warn!("Failed to persist rows for {source_id}: {e}");
        }
    }
}

impl<S: StatSource> StatSource for CachedSource<S> {
    fn fetch(&self, source_id: &str) -> Result<Vec<StatRow>, FetchError> {
        if let Some(rows) = self
            .memory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source_id)
        {
            debug!("Memory cache hit for {source_id}");
            return Ok(rows.clone());
        }

        let persisted = self.load_persisted(source_id);
        if let Some((rows, true)) = &persisted {
            debug!("Database cache hit for {source_id}");
            self.remember(source_id, rows);
            return Ok(rows.clone());
        }

        match self.inner.fetch(source_id) {
            Ok(rows) => {
                info!("Fetched {} rows for {source_id}", rows.len());
                self.persist(source_id, &rows);
                self.remember(source_id, &rows);
                Ok(rows)
            }
            Err(e) => match persisted {
                Some((rows, _)) => {
                    warn!("Refetch of {source_id} failed ({e}), using stale cached rows");
                    self.remember(source_id, &rows);
                    Ok(rows)
                }
                None => Err(e),
            },
        }
    }

    /// Labels never expire; a failed lookup is not cached.
    fn variable_label(&self, source_id: &str) -> Result<String, FetchError> {
        if let Some(db) = &self.db {
            match db.cached_label(source_id, &self.dataset) {
                Ok(Some(label)) => return Ok(label),
                Ok(None) => {}
                Err(e) => warn!("Failed to read cached label for {source_id}: {e}"),
            }
        }
        let label = self.inner.variable_label(source_id)?;
        if let Some(db) = &self.db {
            if let Err(e) = db.store_label(source_id, &self.dataset, &label) {
                warn!("Failed to persist label for {source_id}: {e}");
            }
        }
        Ok(label)
    }

    fn invalidate(&self) {
        self.clear_memory();
        if let Some(db) = &self.db {
            match db.clear_cache() {
                Ok(n) => info!("Dropped {n} cached row sets"),
                Err(e) => warn!("Failed to clear row cache: {e}"),
            }
        }
        self.inner.invalidate();
    }
}
