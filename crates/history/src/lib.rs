//! Inventory history: immutable snapshot and analysis records.
//!
//! Records are append-only facts. Nothing in this crate mutates a record after
//! it has been built.

pub mod record;

pub use record::{AnalysisFigures, Baseline, InventoryRecord, InventoryRecordItem, RecordKind};
