//! Inventory domain module.
//!
//! This crate contains business rules for beverage stock held across several
//! physical locations, implemented purely as deterministic domain logic (no
//! IO, no HTTP, no storage).

pub mod item;

pub use item::{InventoryItem, StockByLocation};
