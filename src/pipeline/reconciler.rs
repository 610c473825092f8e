use crate::core::{ConflictRetryPolicy, PipelineError, PipelineResult};
use crate::model::{Product, ReconciliationReceipt, Sale, PRODUCTS, RECONCILIATIONS};
use crate::store::{to_body, DocumentStore, Precondition, WriteBatch};
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Applies a newly created sale to product stock levels.
///
/// One atomic batch per sale: every affected product update plus a
/// reconciliation receipt, all revision-checked. A conflicted commit is
/// retried from a fresh read per the configured policy; a redelivered event
/// finds the receipt and becomes a no-op.
pub struct StockReconciler<S> {
    store: Arc<S>,
    retry: ConflictRetryPolicy,
}

impl<S: DocumentStore> StockReconciler<S> {
    pub fn new(store: Arc<S>, retry: ConflictRetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Entry point for the sale-created trigger.
    ///
    /// Errors propagate to the caller: the invocation fails and the
    /// platform redelivers, which the receipt makes safe.
    pub async fn apply_sale(&self, sale_id: &str, document: &Value) -> PipelineResult<()> {
        if self.already_applied(sale_id).await? {
            debug!(%sale_id, "sale already reconciled, skipping redelivery");
            return Ok(());
        }

        let sale: Sale = serde_json::from_value(document.clone())
            .map_err(|err| PipelineError::InvalidPayload(format!("sale '{sale_id}': {err}")))?;

        let mut attempt = 1;
        loop {
            match self.try_apply(sale_id, &sale).await {
                Ok(receipt) => {
                    info!(
                        %sale_id,
                        adjusted = receipt.products_adjusted,
                        skipped = receipt.items_skipped,
                        "stock reconciled"
                    );
                    return Ok(());
                }
                Err(PipelineError::Store(err)) if err.is_conflict() => {
                    // A concurrent invocation of the same event may have won
                    // the receipt race; that is success, not a conflict.
                    if self.already_applied(sale_id).await? {
                        debug!(%sale_id, "concurrent delivery reconciled this sale");
                        return Ok(());
                    }
                    if attempt >= self.retry.max_attempts {
                        return Err(PipelineError::RetriesExhausted(attempt, err.to_string()));
                    }
                    let backoff = self.retry.backoff_ms(attempt);
                    warn!(%sale_id, attempt, backoff_ms = backoff, %err, "commit conflicted, retrying");
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn already_applied(&self, sale_id: &str) -> PipelineResult<bool> {
        Ok(self.store.get(RECONCILIATIONS, sale_id).await?.is_some())
    }

    /// One read-stage-commit cycle over the sale's line items.
    async fn try_apply(&self, sale_id: &str, sale: &Sale) -> PipelineResult<ReconciliationReceipt> {
        let mut batch = WriteBatch::new();
        let mut adjusted: u64 = 0;
        let mut skipped: u64 = 0;

        // A sale may list the same product on several lines; fold them so
        // the batch stages one update per product.
        let mut sold: BTreeMap<&str, i64> = BTreeMap::new();
        for item in &sale.items {
            if item.quantity <= 0 {
                warn!(
                    %sale_id,
                    product_id = %item.product_id,
                    quantity = item.quantity,
                    "invalid line item quantity, skipping item"
                );
                skipped += 1;
                continue;
            }
            *sold.entry(item.product_id.as_str()).or_insert(0) += item.quantity;
        }

        for (product_id, quantity_sold) in sold {
            let Some(doc) = self.store.get(PRODUCTS, product_id).await? else {
                debug!(%sale_id, %product_id, "product not found, skipping line item");
                skipped += 1;
                continue;
            };

            let product: Product = match doc.decode() {
                Ok(product) => product,
                Err(err) => {
                    warn!(%sale_id, %product_id, %err, "malformed product document, skipping item");
                    skipped += 1;
                    continue;
                }
            };

            let new_quantity = (product.quantity - quantity_sold).max(0);

            let mut fields = Map::new();
            fields.insert("quantity".to_string(), new_quantity.into());
            fields.insert(
                "updated_at".to_string(),
                Utc::now().timestamp_millis().into(),
            );
            batch.update(
                PRODUCTS,
                product_id,
                fields,
                Precondition::RevisionIs(doc.revision),
            );
            adjusted += 1;
        }

        let receipt = ReconciliationReceipt {
            sale_id: sale_id.to_string(),
            products_adjusted: adjusted,
            items_skipped: skipped,
            applied_at: Utc::now(),
        };
        batch.create(RECONCILIATIONS, sale_id, to_body(&receipt)?);

        self.store.commit(batch).await?;
        Ok(receipt)
    }
}
