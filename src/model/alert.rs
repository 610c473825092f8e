use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Collection holding stock alert documents.
pub const STOCK_ALERTS: &str = "stock_alerts";

/// Alert category discriminator. Only low-stock alerts exist today.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    LowStock,
}

/// A low-stock alert raised by the threshold monitor.
///
/// Carries a snapshot of the product name and stock level at the moment of
/// the crossing; never mutated afterwards (the dashboard flips `read`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockAlert {
    pub product_id: String,

    pub product_name: String,

    /// Stock level observed when the alert fired.
    pub stock_at_alert: i64,

    pub kind: AlertKind,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub read: bool,
}

impl StockAlert {
    /// Deterministic document id: one alert per product per calendar day.
    ///
    /// Redelivered update events and overlapping crossing pairs map to the
    /// same id, so the create precondition suppresses duplicates.
    pub fn dedup_id(product_id: &str, day: NaiveDate) -> String {
        let key = format!("{product_id}:{day}");
        Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
    }
}
