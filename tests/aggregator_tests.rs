/// Metrics aggregator tests
///
/// The aggregation window is a pure function of the logical run date, so
/// every case here is reproducible: fixed sale timestamps in, fixed
/// metrics out.
/// Run with: cargo test --test aggregator_tests
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use stockflow::{
    to_body, DailyMetrics, DocumentStore, MemoryStore, MetricsAggregator, Query, Sale, SaleItem,
    SaleStatus, WriteBatch, DAILY_METRICS, SALES,
};
use uuid::Uuid;

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

async fn seed_sale(store: &MemoryStore, total: f64, units: &[i64], created_at: DateTime<Utc>) {
    let sale = Sale {
        items: units
            .iter()
            .enumerate()
            .map(|(index, quantity)| SaleItem {
                product_id: format!("p{index}"),
                quantity: *quantity,
            })
            .collect(),
        total,
        created_at,
        status: SaleStatus::Completed,
    };
    let mut batch = WriteBatch::new();
    batch.put(SALES, &Uuid::new_v4().to_string(), to_body(&sale).unwrap());
    store.commit(batch).await.unwrap();
}

async fn stored_metrics(store: &MemoryStore) -> Vec<DailyMetrics> {
    store
        .query(DAILY_METRICS, Query::new())
        .await
        .unwrap()
        .iter()
        .map(|doc| doc.decode().unwrap())
        .collect()
}

#[tokio::test]
async fn test_aggregates_one_day_of_sales() {
    let store = Arc::new(MemoryStore::new());
    let noon = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
    seed_sale(&store, 20.0, &[2], noon).await;
    seed_sale(&store, 30.0, &[3], noon).await;

    let metrics = MetricsAggregator::new(store.clone())
        .run(run_date())
        .await
        .unwrap();

    assert_eq!(metrics.date, run_date());
    assert_eq!(metrics.total_amount, 50.0);
    assert_eq!(metrics.sale_count, 2);
    assert_eq!(metrics.units_sold, 5);
    assert_eq!(metrics.average_ticket, 25.0);

    let rows = stored_metrics(&store).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_amount, 50.0);
}

#[tokio::test]
async fn test_empty_day_writes_zero_row() {
    let store = Arc::new(MemoryStore::new());

    let metrics = MetricsAggregator::new(store.clone())
        .run(run_date())
        .await
        .unwrap();

    assert_eq!(metrics.sale_count, 0);
    assert_eq!(metrics.total_amount, 0.0);
    assert_eq!(metrics.units_sold, 0);
    // No division by zero: an empty day has a zero ticket.
    assert_eq!(metrics.average_ticket, 0.0);
    assert_eq!(store.count(DAILY_METRICS).await, 1);
}

#[tokio::test]
async fn test_window_excludes_neighboring_days() {
    let store = Arc::new(MemoryStore::new());

    let day_before = Utc.with_ymd_and_hms(2025, 6, 14, 23, 59, 59).unwrap();
    let first_instant = Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap();
    let day_after = Utc.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap();

    seed_sale(&store, 10.0, &[1], day_before).await;
    seed_sale(&store, 20.0, &[2], first_instant).await;
    seed_sale(&store, 40.0, &[4], day_after).await;

    let metrics = MetricsAggregator::new(store.clone())
        .run(run_date())
        .await
        .unwrap();

    // Midnight is inclusive, the next midnight is not.
    assert_eq!(metrics.sale_count, 1);
    assert_eq!(metrics.total_amount, 20.0);
    assert_eq!(metrics.units_sold, 2);
}

#[tokio::test]
async fn test_backfill_of_past_date_is_deterministic() {
    let store = Arc::new(MemoryStore::new());
    let past_noon = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
    seed_sale(&store, 75.0, &[5], past_noon).await;
    // Newer data must not leak into the backfilled day.
    let later = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
    seed_sale(&store, 99.0, &[9], later).await;

    let metrics = MetricsAggregator::new(store.clone())
        .run(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        .await
        .unwrap();

    assert_eq!(metrics.sale_count, 1);
    assert_eq!(metrics.total_amount, 75.0);
}

#[tokio::test]
async fn test_rerun_appends_second_row() {
    let store = Arc::new(MemoryStore::new());
    let noon = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
    seed_sale(&store, 20.0, &[2], noon).await;

    let aggregator = MetricsAggregator::new(store.clone());
    aggregator.run(run_date()).await.unwrap();
    aggregator.run(run_date()).await.unwrap();

    // Runs append rather than upsert; a rerun leaves two rows for the same
    // date and consumers pick the freshest computed_at. Asserted here so a
    // change to upsert semantics is a deliberate decision, not an accident.
    let rows = stored_metrics(&store).await;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.date == run_date()));
    assert!(rows.iter().all(|row| row.total_amount == 20.0));
}

#[tokio::test]
async fn test_malformed_sale_document_excluded() {
    let store = Arc::new(MemoryStore::new());
    let noon = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
    seed_sale(&store, 20.0, &[2], noon).await;

    // In the window, but the total is garbage: skipped, not fatal.
    let mut batch = WriteBatch::new();
    batch.put(
        SALES,
        "broken",
        json!({"created_at": noon.timestamp_millis(), "total": "twenty"}),
    );
    store.commit(batch).await.unwrap();

    let metrics = MetricsAggregator::new(store.clone())
        .run(run_date())
        .await
        .unwrap();

    assert_eq!(metrics.sale_count, 1);
    assert_eq!(metrics.total_amount, 20.0);
}

#[tokio::test]
async fn test_sale_without_items_counts_zero_units() {
    let store = Arc::new(MemoryStore::new());
    let noon = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

    let mut batch = WriteBatch::new();
    batch.put(
        SALES,
        "item-less",
        json!({"total": 15.0, "created_at": noon.timestamp_millis()}),
    );
    store.commit(batch).await.unwrap();

    let metrics = MetricsAggregator::new(store.clone())
        .run(run_date())
        .await
        .unwrap();

    assert_eq!(metrics.sale_count, 1);
    assert_eq!(metrics.total_amount, 15.0);
    assert_eq!(metrics.units_sold, 0);
}
