use super::events::TriggerEvent;
use crate::core::{PipelineConfig, PipelineResult};
use crate::pipeline::{MetricsAggregator, RetentionSweeper, StockReconciler, ThresholdMonitor};
use crate::store::DocumentStore;
use std::sync::Arc;
use tracing::error;

/// Dispatches trigger events to the pipeline components.
///
/// Each `handle` call is one stateless invocation. Failures propagate to
/// the caller so the hosting platform can mark the invocation failed and
/// redeliver; the components' dedup keys make redelivery safe.
pub struct PipelineRunner<S> {
    reconciler: StockReconciler<S>,
    monitor: ThresholdMonitor<S>,
    aggregator: MetricsAggregator<S>,
    sweeper: RetentionSweeper<S>,
}

impl<S: DocumentStore> PipelineRunner<S> {
    pub fn new(store: Arc<S>, config: PipelineConfig) -> Self {
        Self {
            reconciler: StockReconciler::new(store.clone(), config.conflict_retry.clone()),
            monitor: ThresholdMonitor::new(store.clone(), config.low_stock_threshold),
            aggregator: MetricsAggregator::new(store.clone()),
            sweeper: RetentionSweeper::new(store, config.cart_retention_days),
        }
    }

    /// Handle one trigger invocation.
    pub async fn handle(&self, event: TriggerEvent) -> PipelineResult<()> {
        let result = match event {
            TriggerEvent::SaleCreated { sale_id, document } => {
                self.reconciler.apply_sale(&sale_id, &document).await
            }
            TriggerEvent::ProductUpdated {
                product_id,
                before,
                after,
            } => self
                .monitor
                .inspect_update(&product_id, &before, &after)
                .await
                .map(|_| ()),
            TriggerEvent::MetricsTick { run_date } => {
                self.aggregator.run(run_date).await.map(|_| ())
            }
            TriggerEvent::RetentionTick { now } => self.sweeper.run(now).await.map(|_| ()),
        };

        if let Err(err) = &result {
            error!(%err, "trigger invocation failed");
        }
        result
    }
}
