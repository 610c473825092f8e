pub mod events;
pub mod runner;

pub use events::{product_update_events, TriggerEvent};
pub use runner::PipelineRunner;
