//! Application services.
//!
//! Each service validates input with the domain crates, then reads and writes
//! through the store traits. Validation always happens before the first write.

pub mod inventory;
pub mod purchasing;
pub mod reconciliation;
pub mod register;

use thiserror::Error;

use barstock_core::{DomainError, RecordId};

use crate::store::StoreError;

pub use inventory::InventoryService;
pub use purchasing::{NewPurchaseOrder, PurchasingService};
pub use reconciliation::ReconciliationService;
pub use register::RegisterService;

/// Write step of a consumption analysis that runs after the record is saved.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PersistStep {
    StockReset,
    OrderArchive,
}

impl PersistStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersistStep::StockReset => "stock_reset",
            PersistStep::OrderArchive => "order_archive",
        }
    }
}

impl core::fmt::Display for PersistStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The analysis record was saved but a later step failed. Nothing is
    /// rolled back; the operator has to compare the record with current stock.
    #[error("analysis {record_id} saved but {step} failed: {source}")]
    PartialApply {
        step: PersistStep,
        record_id: RecordId,
        #[source]
        source: StoreError,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;
