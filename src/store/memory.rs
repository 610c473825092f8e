use super::batch::{BatchOp, Precondition, WriteBatch};
use super::document::Document;
use super::engine::DocumentStore;
use super::query::{compare_values, Query, SortOrder};
use crate::core::{Result, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// Before/after images of one committed document write.
///
/// `before` is `None` for creates, `after` is `None` for deletes.
#[derive(Debug, Clone)]
pub struct DocumentChange {
    pub collection: String,
    pub id: String,
    pub before: Option<Document>,
    pub after: Option<Document>,
}

#[derive(Debug, Clone)]
struct Stored {
    revision: u64,
    body: Value,
}

#[derive(Default)]
struct Inner {
    /// BTreeMap keeps per-collection iteration in id order, so unordered
    /// queries are deterministic.
    collections: HashMap<String, BTreeMap<String, Stored>>,
    changes: Vec<DocumentChange>,
}

/// In-memory reference store.
///
/// A single writer lock gives batch commits their all-or-nothing semantics:
/// preconditions are checked against the pre-batch state, and a failure
/// leaves the store untouched.
///
/// Committed writes land in a drainable change feed — the local stand-in
/// for the platform's document change stream that drives update triggers.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the change feed accumulated since the last call.
    pub async fn drain_changes(&self) -> Vec<DocumentChange> {
        let mut inner = self.inner.write().await;
        std::mem::take(&mut inner.changes)
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        let inner = self.inner.read().await;
        inner
            .collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    fn check_precondition(
        inner: &Inner,
        collection: &str,
        id: &str,
        precondition: &Precondition,
        requires_existing: bool,
    ) -> Result<()> {
        let current = inner
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id));

        match precondition {
            Precondition::None => {
                if requires_existing && current.is_none() {
                    return Err(StoreError::DocumentNotFound(
                        collection.to_string(),
                        id.to_string(),
                    ));
                }
            }
            Precondition::MustNotExist => {
                if current.is_some() {
                    return Err(StoreError::DocumentExists(
                        collection.to_string(),
                        id.to_string(),
                    ));
                }
            }
            Precondition::RevisionIs(expected) => match current {
                None => {
                    return Err(StoreError::DocumentNotFound(
                        collection.to_string(),
                        id.to_string(),
                    ));
                }
                Some(stored) if stored.revision != *expected => {
                    return Err(StoreError::RevisionConflict(
                        collection.to_string(),
                        id.to_string(),
                        *expected,
                        stored.revision,
                    ));
                }
                Some(_) => {}
            },
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let inner = self.inner.read().await;
        Ok(inner
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|stored| Document {
                id: id.to_string(),
                revision: stored.revision,
                body: stored.body.clone(),
            }))
    }

    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>> {
        let inner = self.inner.read().await;
        let Some(docs) = inner.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Document> = docs
            .iter()
            .filter(|(_, stored)| query.matches(&stored.body))
            .map(|(id, stored)| Document {
                id: id.clone(),
                revision: stored.revision,
                body: stored.body.clone(),
            })
            .collect();

        if let Some((field, order)) = query.ordering() {
            matched.sort_by(|a, b| {
                let va = a.body.get(field).unwrap_or(&Value::Null);
                let vb = b.body.get(field).unwrap_or(&Value::Null);
                let ordering = compare_values(va, vb);
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.result_limit() {
            matched.truncate(limit);
        }

        Ok(matched)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<()> {
        let ops = batch.into_ops();
        let mut inner = self.inner.write().await;

        // Validation pass: every precondition against the pre-batch state.
        for op in &ops {
            match op {
                BatchOp::Put {
                    collection,
                    id,
                    precondition,
                    ..
                } => {
                    Self::check_precondition(&inner, collection, id, precondition, false)?;
                }
                BatchOp::Update {
                    collection,
                    id,
                    precondition,
                    ..
                } => {
                    Self::check_precondition(&inner, collection, id, precondition, true)?;
                    let stored = inner
                        .collections
                        .get(collection.as_str())
                        .and_then(|docs| docs.get(id.as_str()));
                    if let Some(stored) = stored {
                        if !stored.body.is_object() {
                            return Err(StoreError::MalformedDocument(format!(
                                "cannot merge fields into non-object document '{collection}/{id}'"
                            )));
                        }
                    }
                }
                BatchOp::Delete { .. } => {}
            }
        }

        // Apply pass: infallible from here on.
        let Inner {
            collections,
            changes,
        } = &mut *inner;

        for op in ops {
            match op {
                BatchOp::Put {
                    collection,
                    id,
                    body,
                    ..
                } => {
                    let docs = collections.entry(collection.clone()).or_default();
                    let before = docs.get(&id).map(|stored| Document {
                        id: id.clone(),
                        revision: stored.revision,
                        body: stored.body.clone(),
                    });
                    let revision = before.as_ref().map(|d| d.revision + 1).unwrap_or(1);
                    docs.insert(
                        id.clone(),
                        Stored {
                            revision,
                            body: body.clone(),
                        },
                    );
                    changes.push(DocumentChange {
                        collection,
                        id: id.clone(),
                        before,
                        after: Some(Document { id, revision, body }),
                    });
                }
                BatchOp::Update {
                    collection,
                    id,
                    fields,
                    ..
                } => {
                    let docs = collections.entry(collection.clone()).or_default();
                    // Existence is guaranteed by the validation pass.
                    let Some(stored) = docs.get_mut(&id) else {
                        continue;
                    };
                    let before = Document {
                        id: id.clone(),
                        revision: stored.revision,
                        body: stored.body.clone(),
                    };
                    if let Value::Object(body) = &mut stored.body {
                        for (key, value) in fields {
                            body.insert(key, value);
                        }
                    }
                    stored.revision += 1;
                    let after = Document {
                        id: id.clone(),
                        revision: stored.revision,
                        body: stored.body.clone(),
                    };
                    changes.push(DocumentChange {
                        collection,
                        id,
                        before: Some(before),
                        after: Some(after),
                    });
                }
                BatchOp::Delete { collection, id } => {
                    let Some(docs) = collections.get_mut(&collection) else {
                        continue;
                    };
                    if let Some(stored) = docs.remove(&id) {
                        changes.push(DocumentChange {
                            collection,
                            id: id.clone(),
                            before: Some(Document {
                                id,
                                revision: stored.revision,
                                body: stored.body,
                            }),
                            after: None,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
