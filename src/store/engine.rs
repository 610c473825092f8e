use super::batch::WriteBatch;
use super::document::Document;
use super::query::Query;
use crate::core::Result;
use async_trait::async_trait;

/// Document store boundary — allows pluggable backends.
///
/// The contract the pipeline relies on:
/// - point reads return the document with its current revision;
/// - queries are filtered range scans over one collection;
/// - `commit` applies a batch atomically: every operation's precondition is
///   checked against the pre-batch state, and either all operations apply
///   or none do.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point-read a document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Run a filtered query over one collection.
    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>>;

    /// Apply a batch of mutations as a single all-or-nothing unit.
    async fn commit(&self, batch: WriteBatch) -> Result<()>;
}
