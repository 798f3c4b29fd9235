use std::collections::HashMap;

use chrono::{DateTime, Utc};

use barstock_core::{DomainError, ItemId, LocationId, RecordId};
use barstock_history::InventoryRecord;
use barstock_inventory::InventoryItem;
use barstock_reconciliation::{AnalysisOutcome, ConsumptionReport, run_analysis, take_snapshot};

use super::{PersistStep, ServiceError, ServiceResult};
use crate::store::{HistoryStore, ItemStore, OrderStore};

/// Drives snapshots and consumption analyses over the three stores.
///
/// Writes of one analysis happen in a fixed order (record, stock resets, order
/// archiving) with no transaction across stores.
pub struct ReconciliationService<I, O, H> {
    items: I,
    orders: O,
    history: H,
    reset_location: LocationId,
}

impl<I, O, H> ReconciliationService<I, O, H>
where
    I: ItemStore,
    O: OrderStore,
    H: HistoryStore,
{
    pub fn new(items: I, orders: O, history: H, reset_location: LocationId) -> Self {
        Self {
            items,
            orders,
            history,
            reset_location,
        }
    }

    /// Compute consumption for the period ending `now`, persist the record,
    /// zero every item and archive every completed order.
    pub async fn run_analysis(&self, now: DateTime<Utc>) -> ServiceResult<AnalysisOutcome> {
        let items = self.items.list().await?;
        let orders = self.orders.list().await?;
        let history = self.history.list().await?;

        let outcome = run_analysis(&items, &orders, &history, &self.reset_location, now)?;

        let record = self.history.save(outcome.record.clone()).await?;
        let record_id = record.id_typed();

        let by_id: HashMap<ItemId, &InventoryItem> =
            items.iter().map(|i| (i.id_typed(), i)).collect();
        for reset in &outcome.resets {
            let Some(current) = by_id.get(&reset.item_id) else {
                continue;
            };
            let mut item = (*current).clone();
            reset.apply(&mut item);
            if let Err(source) = self.items.save(item).await {
                return Err(self.partial(PersistStep::StockReset, record_id, source));
            }
        }

        for order in &outcome.orders_to_archive {
            if let Err(source) = self.orders.save(order.clone()).await {
                return Err(self.partial(PersistStep::OrderArchive, record_id, source));
            }
        }

        tracing::info!(
            record_id = %record_id,
            items = outcome.resets.len(),
            archived_orders = outcome.orders_to_archive.len(),
            "consumption analysis saved"
        );

        Ok(AnalysisOutcome { record, ..outcome })
    }

    fn partial(
        &self,
        step: PersistStep,
        record_id: RecordId,
        source: crate::store::StoreError,
    ) -> ServiceError {
        tracing::warn!(
            record_id = %record_id,
            %step,
            error = %source,
            "analysis partially applied; stock and orders need manual reconciliation"
        );
        ServiceError::PartialApply {
            step,
            record_id,
            source,
        }
    }

    /// Record current stock without touching items or orders.
    pub async fn take_snapshot(&self, now: DateTime<Utc>) -> ServiceResult<InventoryRecord> {
        let items = self.items.list().await?;
        let record = take_snapshot(&items, now)?;
        let saved = self.history.save(record).await?;
        tracing::info!(record_id = %saved.id_typed(), items = saved.items().len(), "inventory snapshot saved");
        Ok(saved)
    }

    /// All records, newest first.
    pub async fn history(&self) -> ServiceResult<Vec<InventoryRecord>> {
        let mut records = self.history.list().await?;
        records.sort_by(|a, b| b.date().cmp(&a.date()));
        Ok(records)
    }

    pub async fn record(&self, id: RecordId) -> ServiceResult<InventoryRecord> {
        self.history
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("inventory record").into())
    }

    pub async fn consumption_report(&self, id: RecordId) -> ServiceResult<ConsumptionReport> {
        let record = self.record(id).await?;
        Ok(ConsumptionReport::from_record(&record)?)
    }

    /// Wipe the whole history. Irreversible; refused unless `confirmed`.
    pub async fn delete_history(&self, confirmed: bool) -> ServiceResult<u64> {
        if !confirmed {
            tracing::warn!("history deletion requested without confirmation");
            return Err(DomainError::validation(
                "deleting the inventory history requires explicit confirmation",
            )
            .into());
        }
        let removed = self.history.delete_all().await?;
        tracing::warn!(removed, "inventory history deleted");
        Ok(removed)
    }
}
