use thiserror::Error;

/// Errors surfaced at the document-store boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document '{0}/{1}' not found")]
    DocumentNotFound(String, String),

    #[error("Document '{0}/{1}' already exists")]
    DocumentExists(String, String),

    #[error("Revision conflict on '{0}/{1}': expected {2}, found {3}")]
    RevisionConflict(String, String, u64, u64),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Whether the error is a concurrency conflict the caller may retry:
    /// a revision precondition that no longer holds, or a create that lost
    /// a race against another writer.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::RevisionConflict(..) | StoreError::DocumentExists(..)
        )
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}

/// Errors surfaced by pipeline components.
///
/// Keeps store vocabulary out of trigger-facing call sites: a component
/// either failed against the store, rejected its input, or gave up retrying
/// a conflicted commit.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid trigger payload: {0}")]
    InvalidPayload(String),

    #[error("Conflict retries exhausted after {0} attempts: {1}")]
    RetriesExhausted(usize, String),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
