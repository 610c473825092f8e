use crate::model::{Product, PRODUCTS};
use crate::store::DocumentChange;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

/// Inbound trigger boundary.
///
/// Each variant carries everything the invocation may depend on: document
/// payloads for the event triggers, logical clock readings for the timer
/// ticks. Components never consult wall clock for windowing, which makes
/// reruns and backfills reproducible.
#[derive(Debug, Clone)]
pub enum TriggerEvent {
    /// A sale document was created. Carries the raw body so malformed
    /// payloads surface inside the pipeline rather than at the boundary.
    SaleCreated { sale_id: String, document: Value },

    /// A product document was updated, with both snapshots.
    ProductUpdated {
        product_id: String,
        before: Product,
        after: Product,
    },

    /// Daily metrics timer tick with its logical run date.
    MetricsTick { run_date: NaiveDate },

    /// Weekly retention timer tick with its logical clock reading.
    RetentionTick { now: DateTime<Utc> },
}

/// Convert drained store changes into product-updated trigger events.
///
/// Local stand-in for the platform's change feed: creates, deletes, and
/// documents that do not decode as products are ignored, exactly as the
/// platform only fires the update trigger for well-formed update pairs.
pub fn product_update_events(changes: &[DocumentChange]) -> Vec<TriggerEvent> {
    changes
        .iter()
        .filter(|change| change.collection == PRODUCTS)
        .filter_map(|change| {
            let before = change.before.as_ref()?.decode::<Product>().ok()?;
            let after = change.after.as_ref()?.decode::<Product>().ok()?;
            Some(TriggerEvent::ProductUpdated {
                product_id: change.id.clone(),
                before,
                after,
            })
        })
        .collect()
}
