use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding temporary cart documents.
pub const TEMP_CARTS: &str = "temp_carts";

/// A browser session's in-progress cart, parked server-side.
///
/// Contents are free-form; the sweeper only ever looks at `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemporaryCart {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub contents: serde_json::Value,
}
