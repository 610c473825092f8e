pub mod batch;
pub mod document;
pub mod engine;
pub mod memory;
pub mod query;

pub use batch::{BatchOp, Precondition, WriteBatch};
pub use document::{to_body, Document};
pub use engine::DocumentStore;
pub use memory::{DocumentChange, MemoryStore};
pub use query::{Filter, FilterOp, Query, SortOrder};
