use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding sale documents.
pub const SALES: &str = "sales";

/// One line of a sale: a product reference and the units sold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleItem {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Completed,
    Pending,
    Cancelled,
}

impl Default for SaleStatus {
    fn default() -> Self {
        Self::Completed
    }
}

/// A recorded sale. Immutable once created — the pipeline only reads it.
///
/// `items` and `total` default when absent, matching how the dashboard
/// tolerates sparse sale documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sale {
    #[serde(default)]
    pub items: Vec<SaleItem>,

    #[serde(default)]
    pub total: f64,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub status: SaleStatus,
}
