pub mod alert;
pub mod cart;
pub mod metrics;
pub mod product;
pub mod receipt;
pub mod sale;

pub use alert::{AlertKind, StockAlert, STOCK_ALERTS};
pub use cart::{TemporaryCart, TEMP_CARTS};
pub use metrics::{DailyMetrics, DAILY_METRICS};
pub use product::{Product, PRODUCTS};
pub use receipt::{ReconciliationReceipt, RECONCILIATIONS};
pub use sale::{Sale, SaleItem, SaleStatus, SALES};
