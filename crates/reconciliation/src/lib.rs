//! Consumption reconciliation.
//!
//! Pure decision logic: given the current inventory, the purchase orders and
//! the history, compute what the next history record looks like and which
//! writes must follow. Nothing here performs IO; applying the outcome is the
//! job of the infrastructure layer.

pub mod engine;
pub mod report;

pub use engine::{
    AnalysisOutcome, StockReset, pending_stock, reset_all_stocks, run_analysis, select_baseline,
    take_snapshot,
};
pub use report::{CONSUMPTION_EPSILON, ConsumptionLine, ConsumptionReport};
