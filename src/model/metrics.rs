use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding daily metrics documents.
pub const DAILY_METRICS: &str = "daily_metrics";

/// One aggregation run's summary of a calendar day of sales.
///
/// Rows accumulate: re-running a day appends a second row rather than
/// replacing the first. Consumers take the latest `computed_at` per date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyMetrics {
    pub date: NaiveDate,

    pub total_amount: f64,

    pub sale_count: u64,

    /// Units summed over every line item of every sale in the window.
    pub units_sold: i64,

    /// `total_amount / sale_count`, or 0 for an empty day.
    pub average_ticket: f64,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub computed_at: DateTime<Utc>,
}
