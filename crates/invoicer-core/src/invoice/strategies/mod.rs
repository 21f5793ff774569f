//! One strategy per supported supplier layout.

mod amazon;
mod amazon_order_summary;
mod soak_rochford;

pub use amazon::AmazonInvoice;
pub use amazon_order_summary::AmazonOrderSummary;
pub use soak_rochford::SoakRochford;
