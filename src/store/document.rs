use crate::core::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A stored document: identifier, revision, JSON body.
///
/// The revision increments on every committed write and backs the
/// optimistic-concurrency preconditions of `WriteBatch`.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub revision: u64,
    pub body: Value,
}

impl Document {
    /// Decode the body into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone()).map_err(Into::into)
    }
}

/// Serialize a model into a document body.
pub fn to_body<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(Into::into)
}
