use crate::core::{PipelineResult, StoreError};
use crate::model::{AlertKind, Product, StockAlert, STOCK_ALERTS};
use crate::store::{to_body, DocumentStore, WriteBatch};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Watches product updates for downward low-stock threshold crossings.
///
/// The crossing check is a pure function of the two snapshots the trigger
/// delivers; the monitor never re-reads the product. The alert id is
/// derived from product and day, so overlapping crossing pairs and
/// redelivered events collapse into one alert.
pub struct ThresholdMonitor<S> {
    store: Arc<S>,
    threshold: i64,
}

impl<S: DocumentStore> ThresholdMonitor<S> {
    pub fn new(store: Arc<S>, threshold: i64) -> Self {
        Self { store, threshold }
    }

    /// Downward crossing: above the floor before, at or below it after.
    pub fn crossed(&self, before: &Product, after: &Product) -> bool {
        before.quantity > self.threshold && after.quantity <= self.threshold
    }

    /// Entry point for the product-updated trigger.
    ///
    /// Returns the alert if one was raised, `None` when the update is not a
    /// crossing or the day's alert already exists.
    pub async fn inspect_update(
        &self,
        product_id: &str,
        before: &Product,
        after: &Product,
    ) -> PipelineResult<Option<StockAlert>> {
        if !self.crossed(before, after) {
            return Ok(None);
        }

        let now = Utc::now();
        let alert = StockAlert {
            product_id: product_id.to_string(),
            product_name: after.name.clone(),
            stock_at_alert: after.quantity,
            kind: AlertKind::LowStock,
            created_at: now,
            read: false,
        };

        let alert_id = StockAlert::dedup_id(product_id, now.date_naive());
        let mut batch = WriteBatch::new();
        batch.create(STOCK_ALERTS, &alert_id, to_body(&alert)?);

        match self.store.commit(batch).await {
            Ok(()) => {
                info!(
                    %product_id,
                    product = %alert.product_name,
                    stock = alert.stock_at_alert,
                    "low-stock alert raised"
                );
                Ok(Some(alert))
            }
            Err(StoreError::DocumentExists(..)) => {
                debug!(%product_id, "low-stock alert already raised today");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}
