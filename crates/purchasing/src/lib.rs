//! Purchasing domain module.
//!
//! Purchase orders to suppliers and their receipt lifecycle. Completed orders
//! are the "pending stock" the consumption analysis folds in.

pub mod order;

pub use order::{OrderLine, PurchaseOrder, PurchaseOrderStatus};
