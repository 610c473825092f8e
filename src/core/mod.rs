pub mod config;
pub mod error;

pub use config::{ConflictRetryPolicy, PipelineConfig};
pub use error::{PipelineError, PipelineResult, Result, StoreError};
