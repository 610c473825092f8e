use serde_json::{Map, Value};

/// Precondition attached to a single batch operation.
///
/// A failed precondition fails the whole batch; nothing is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// Apply unconditionally.
    None,
    /// Fail if the document already exists.
    MustNotExist,
    /// Fail unless the document exists at exactly this revision.
    RevisionIs(u64),
}

/// One staged mutation.
#[derive(Debug, Clone)]
pub enum BatchOp {
    /// Insert or replace the full document body.
    Put {
        collection: String,
        id: String,
        body: Value,
        precondition: Precondition,
    },
    /// Merge top-level fields into an existing document.
    Update {
        collection: String,
        id: String,
        fields: Map<String, Value>,
        precondition: Precondition,
    },
    /// Remove the document. Deleting an absent document is a no-op.
    Delete { collection: String, id: String },
}

/// A staged multi-document mutation, committed as one all-or-nothing unit.
///
/// Mirrors the store's batch semantics: operations may span collections,
/// but there are no cross-batch transactions.
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an unconditional full write.
    pub fn put(&mut self, collection: &str, id: &str, body: Value) -> &mut Self {
        self.ops.push(BatchOp::Put {
            collection: collection.to_string(),
            id: id.to_string(),
            body,
            precondition: Precondition::None,
        });
        self
    }

    /// Stage a create that fails if the document already exists.
    pub fn create(&mut self, collection: &str, id: &str, body: Value) -> &mut Self {
        self.ops.push(BatchOp::Put {
            collection: collection.to_string(),
            id: id.to_string(),
            body,
            precondition: Precondition::MustNotExist,
        });
        self
    }

    /// Stage a field merge into an existing document.
    pub fn update(
        &mut self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
        precondition: Precondition,
    ) -> &mut Self {
        self.ops.push(BatchOp::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
            precondition,
        });
        self
    }

    /// Stage a delete.
    pub fn delete(&mut self, collection: &str, id: &str) -> &mut Self {
        self.ops.push(BatchOp::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub(crate) fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}
