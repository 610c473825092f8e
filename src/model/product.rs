use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding product documents.
pub const PRODUCTS: &str = "products";

/// A catalog product and its current stock level.
///
/// The reconciliation pipeline mutates only `quantity` and `updated_at`;
/// everything else belongs to the CRUD surface. Products are never deleted
/// by the pipeline, only soft-deactivated via `active`.
///
/// Field defaults mirror the CRUD layer's create path, so documents written
/// by older clients still decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub name: String,

    pub cost: f64,

    pub price: f64,

    /// Units on hand. Never negative after reconciliation.
    #[serde(default)]
    pub quantity: i64,

    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default)]
    pub supplier: String,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub registered_at: DateTime<Utc>,

    /// Set by the reconciler on every stock adjustment; absent until the
    /// first one.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_active() -> bool {
    true
}
