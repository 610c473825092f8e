use crate::core::PipelineResult;
use crate::model::TEMP_CARTS;
use crate::store::{DocumentStore, FilterOp, Query, WriteBatch};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Deletes temporary carts past the retention window.
///
/// Removal is permanent and atomic: every stale cart goes, or none do.
/// Carts younger than the cutoff are never touched.
pub struct RetentionSweeper<S> {
    store: Arc<S>,
    retention_days: i64,
}

impl<S: DocumentStore> RetentionSweeper<S> {
    pub fn new(store: Arc<S>, retention_days: i64) -> Self {
        Self {
            store,
            retention_days,
        }
    }

    /// Entry point for the weekly timer trigger. `now` is the tick's
    /// logical clock reading.
    pub async fn run(&self, now: DateTime<Utc>) -> PipelineResult<usize> {
        let cutoff = now - Duration::days(self.retention_days);
        let stale = self
            .store
            .query(
                TEMP_CARTS,
                Query::new().filter("created_at", FilterOp::Lt, cutoff.timestamp_millis()),
            )
            .await?;

        if stale.is_empty() {
            debug!(%cutoff, "no stale carts to sweep");
            return Ok(0);
        }

        let mut batch = WriteBatch::new();
        for doc in &stale {
            batch.delete(TEMP_CARTS, &doc.id);
        }
        self.store.commit(batch).await?;

        info!(removed = stale.len(), %cutoff, "temporary carts swept");
        Ok(stale.len())
    }
}
