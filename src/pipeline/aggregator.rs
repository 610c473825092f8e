use crate::core::PipelineResult;
use crate::model::{DailyMetrics, Sale, DAILY_METRICS, SALES};
use crate::store::{to_body, DocumentStore, FilterOp, Query, WriteBatch};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Rolls one calendar day of sales into a single metrics row.
///
/// The day window is a pure function of the logical run date, so reruns
/// and backfills are deterministic. Each run appends its own row; a rerun
/// for the same date yields a second row, and consumers take the latest
/// `computed_at` per date.
pub struct MetricsAggregator<S> {
    store: Arc<S>,
}

impl<S: DocumentStore> MetricsAggregator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Half-open UTC day window `[midnight, midnight + 1 day)`.
    fn day_window(run_date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = run_date.and_time(NaiveTime::MIN).and_utc();
        (start, start + Duration::days(1))
    }

    /// Entry point for the daily timer trigger.
    pub async fn run(&self, run_date: NaiveDate) -> PipelineResult<DailyMetrics> {
        let (start, end) = Self::day_window(run_date);
        let docs = self
            .store
            .query(
                SALES,
                Query::new()
                    .filter("created_at", FilterOp::Gte, start.timestamp_millis())
                    .filter("created_at", FilterOp::Lt, end.timestamp_millis()),
            )
            .await?;

        let mut total_amount = 0.0;
        let mut sale_count: u64 = 0;
        let mut units_sold: i64 = 0;

        for doc in &docs {
            let sale: Sale = match doc.decode() {
                Ok(sale) => sale,
                Err(err) => {
                    warn!(sale_id = %doc.id, %err, "malformed sale document, excluded from metrics");
                    continue;
                }
            };
            total_amount += sale.total;
            sale_count += 1;
            units_sold += sale.items.iter().map(|item| item.quantity).sum::<i64>();
        }

        let average_ticket = if sale_count > 0 {
            total_amount / sale_count as f64
        } else {
            0.0
        };

        let metrics = DailyMetrics {
            date: run_date,
            total_amount,
            sale_count,
            units_sold,
            average_ticket,
            computed_at: Utc::now(),
        };

        let mut batch = WriteBatch::new();
        batch.put(DAILY_METRICS, &Uuid::new_v4().to_string(), to_body(&metrics)?);
        self.store.commit(batch).await?;

        info!(
            date = %run_date,
            sales = sale_count,
            total = total_amount,
            units = units_sold,
            "daily metrics computed"
        );
        Ok(metrics)
    }
}
