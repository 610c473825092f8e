use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding reconciliation receipt documents.
pub const RECONCILIATIONS: &str = "sale_reconciliations";

/// Ledger row recording that a sale's stock decrement has been applied.
///
/// The document id is the sale id, and the row is created in the same
/// atomic batch as the product updates. A redelivered sale-created event
/// finds the receipt and stops, so stock is never decremented twice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconciliationReceipt {
    pub sale_id: String,

    /// Products whose stock this sale adjusted.
    pub products_adjusted: u64,

    /// Line items skipped (missing product, malformed entry).
    pub items_skipped: u64,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub applied_at: DateTime<Utc>,
}
