use chrono::{TimeZone, Utc};
use std::sync::Arc;
use stockflow::{
    AlertKind, DocumentStore, MemoryStore, Product, Query, StockAlert, ThresholdMonitor,
    STOCK_ALERTS,
};

fn snapshot(quantity: i64) -> Product {
    Product {
        name: "Protein Bar".to_string(),
        cost: 1.2,
        price: 2.5,
        quantity,
        category: "snacks".to_string(),
        supplier: "acme".to_string(),
        active: true,
        registered_at: Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap(),
        updated_at: Some(Utc.with_ymd_and_hms(2025, 6, 15, 14, 30, 0).unwrap()),
    }
}

fn monitor(store: &Arc<MemoryStore>, threshold: i64) -> ThresholdMonitor<MemoryStore> {
    ThresholdMonitor::new(store.clone(), threshold)
}

async fn stored_alerts(store: &MemoryStore) -> Vec<StockAlert> {
    store
        .query(STOCK_ALERTS, Query::new())
        .await
        .unwrap()
        .iter()
        .map(|doc| doc.decode().unwrap())
        .collect()
}

#[tokio::test]
async fn test_downward_crossing_raises_exactly_one_alert() {
    let store = Arc::new(MemoryStore::new());

    let alert = monitor(&store, 5)
        .inspect_update("p1", &snapshot(6), &snapshot(5))
        .await
        .unwrap()
        .expect("crossing 6 -> 5 must alert");

    assert_eq!(alert.stock_at_alert, 5);

    let alerts = stored_alerts(&store).await;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].product_id, "p1");
    assert_eq!(alerts[0].product_name, "Protein Bar");
    assert_eq!(alerts[0].stock_at_alert, 5);
    assert_eq!(alerts[0].kind, AlertKind::LowStock);
    assert!(!alerts[0].read);
}

#[tokio::test]
async fn test_no_alert_when_already_below() {
    let store = Arc::new(MemoryStore::new());

    let alert = monitor(&store, 5)
        .inspect_update("p1", &snapshot(4), &snapshot(3))
        .await
        .unwrap();

    assert!(alert.is_none());
    assert_eq!(store.count(STOCK_ALERTS).await, 0);
}

#[tokio::test]
async fn test_no_alert_on_upward_movement() {
    let store = Arc::new(MemoryStore::new());

    let alert = monitor(&store, 5)
        .inspect_update("p1", &snapshot(5), &snapshot(6))
        .await
        .unwrap();

    assert!(alert.is_none());
    assert_eq!(store.count(STOCK_ALERTS).await, 0);
}

#[tokio::test]
async fn test_no_alert_when_staying_above() {
    let store = Arc::new(MemoryStore::new());

    let alert = monitor(&store, 5)
        .inspect_update("p1", &snapshot(20), &snapshot(6))
        .await
        .unwrap();

    assert!(alert.is_none());
}

#[tokio::test]
async fn test_crossing_may_skip_levels() {
    let store = Arc::new(MemoryStore::new());

    // 9 -> 0 jumps straight past the floor; still one crossing.
    let alert = monitor(&store, 5)
        .inspect_update("p1", &snapshot(9), &snapshot(0))
        .await
        .unwrap();

    assert_eq!(alert.unwrap().stock_at_alert, 0);
}

#[tokio::test]
async fn test_same_day_duplicate_crossing_suppressed() {
    let store = Arc::new(MemoryStore::new());
    let monitor = monitor(&store, 5);

    let first = monitor
        .inspect_update("p1", &snapshot(6), &snapshot(5))
        .await
        .unwrap();
    assert!(first.is_some());

    // Restocked and crossed again the same day — overlapping before/after
    // pairs map to the same alert id.
    let second = monitor
        .inspect_update("p1", &snapshot(7), &snapshot(4))
        .await
        .unwrap();
    assert!(second.is_none());

    assert_eq!(store.count(STOCK_ALERTS).await, 1);
}

#[tokio::test]
async fn test_distinct_products_alert_independently() {
    let store = Arc::new(MemoryStore::new());
    let monitor = monitor(&store, 5);

    monitor
        .inspect_update("p1", &snapshot(6), &snapshot(5))
        .await
        .unwrap();
    monitor
        .inspect_update("p2", &snapshot(8), &snapshot(2))
        .await
        .unwrap();

    assert_eq!(store.count(STOCK_ALERTS).await, 2);
}

#[tokio::test]
async fn test_configurable_threshold() {
    let store = Arc::new(MemoryStore::new());

    let alert = monitor(&store, 10)
        .inspect_update("p1", &snapshot(11), &snapshot(10))
        .await
        .unwrap();
    assert!(alert.is_some());

    // The default floor would not have fired here.
    let store = Arc::new(MemoryStore::new());
    let alert = monitor(&store, 5)
        .inspect_update("p1", &snapshot(11), &snapshot(10))
        .await
        .unwrap();
    assert!(alert.is_none());
}

#[tokio::test]
async fn test_alert_kind_serializes_as_low_stock() {
    let store = Arc::new(MemoryStore::new());

    monitor(&store, 5)
        .inspect_update("p1", &snapshot(6), &snapshot(5))
        .await
        .unwrap();

    let docs = store.query(STOCK_ALERTS, Query::new()).await.unwrap();
    assert_eq!(docs[0].body["kind"], "low-stock");
}
