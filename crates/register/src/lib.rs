//! Cash-register sessions: daily income per source, payment split and
//! expenses paid out of the till.

pub mod session;

pub use session::{CashSession, Expense, IncomeBySource, PaymentSplit, SessionSummary, summarize};
