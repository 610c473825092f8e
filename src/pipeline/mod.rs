pub mod aggregator;
pub mod monitor;
pub mod reconciler;
pub mod sweeper;

pub use aggregator::MetricsAggregator;
pub use monitor::ThresholdMonitor;
pub use reconciler::StockReconciler;
pub use sweeper::RetentionSweeper;
