use chrono::{DateTime, Utc};

use barstock_core::{DomainError, DomainResult, ItemId, LocationId, RecordId};
use barstock_history::{AnalysisFigures, InventoryRecord, InventoryRecordItem, RecordKind};
use barstock_inventory::InventoryItem;
use barstock_purchasing::PurchaseOrder;

/// Instruction to zero an item's on-hand stock after an analysis.
///
/// Every location is collapsed into a single zeroed entry at `location`.
#[derive(Debug, Clone, PartialEq)]
pub struct StockReset {
    pub item_id: ItemId,
    pub location: LocationId,
    pub new_stock: f64,
}

impl StockReset {
    pub fn apply(&self, item: &mut InventoryItem) {
        item.reset_to(self.location.clone());
    }
}

/// Everything a consumption analysis decided.
///
/// The caller persists `record`, applies `resets` and saves
/// `orders_to_archive` (already transitioned to `Archived`), in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub record: InventoryRecord,
    pub resets: Vec<StockReset>,
    pub orders_to_archive: Vec<PurchaseOrder>,
}

/// Most recent analysis record, else most recent snapshot.
pub fn select_baseline(history: &[InventoryRecord]) -> Option<&InventoryRecord> {
    latest_of_kind(history, RecordKind::Analysis)
        .or_else(|| latest_of_kind(history, RecordKind::Snapshot))
}

fn latest_of_kind(history: &[InventoryRecord], kind: RecordKind) -> Option<&InventoryRecord> {
    history
        .iter()
        .filter(|r| r.kind() == kind)
        .max_by_key(|r| r.date())
}

/// Quantity received for `item_id` through orders not yet folded into an analysis.
pub fn pending_stock(orders: &[PurchaseOrder], item_id: ItemId) -> f64 {
    orders
        .iter()
        .filter(|o| o.is_pending_stock())
        .map(|o| o.quantity_for(item_id))
        .sum()
}

fn figures_for(
    item: &InventoryItem,
    orders: &[PurchaseOrder],
    baseline: Option<&InventoryRecord>,
) -> AnalysisFigures {
    let current_stock = item.total_stock();
    let pending_stock = pending_stock(orders, item.id_typed());
    let previous_end_stock = baseline
        .map(|r| r.baseline_for(item.id_typed()).quantity())
        .unwrap_or(0.0);

    let initial_stock = previous_end_stock + pending_stock;
    let end_stock = current_stock;

    AnalysisFigures {
        current_stock,
        pending_stock,
        initial_stock,
        end_stock,
        consumption: initial_stock - end_stock,
    }
}

/// Run a consumption analysis over the current inventory.
///
/// Items that exist only in the baseline are ignored; items missing from the
/// baseline start from zero. Negative consumption (stock grew without a
/// logged order) is reported as-is.
pub fn run_analysis(
    items: &[InventoryItem],
    orders: &[PurchaseOrder],
    history: &[InventoryRecord],
    reset_location: &LocationId,
    now: DateTime<Utc>,
) -> DomainResult<AnalysisOutcome> {
    if items.is_empty() {
        return Err(DomainError::validation("nothing to save"));
    }

    let baseline = select_baseline(history);

    let lines = items
        .iter()
        .map(|item| InventoryRecordItem::analysis(item, figures_for(item, orders, baseline)))
        .collect();

    let record = InventoryRecord::new(
        RecordId::new(),
        now,
        InventoryRecord::analysis_label(now),
        RecordKind::Analysis,
        lines,
    );

    let resets = items
        .iter()
        .map(|item| StockReset {
            item_id: item.id_typed(),
            location: reset_location.clone(),
            new_stock: 0.0,
        })
        .collect();

    let orders_to_archive = orders
        .iter()
        .filter(|o| o.is_pending_stock())
        .cloned()
        .map(|mut o| {
            o.archive()?;
            Ok(o)
        })
        .collect::<DomainResult<Vec<_>>>()?;

    Ok(AnalysisOutcome {
        record,
        resets,
        orders_to_archive,
    })
}

/// Capture current per-location stock without consumption math.
pub fn take_snapshot(items: &[InventoryItem], now: DateTime<Utc>) -> DomainResult<InventoryRecord> {
    if items.is_empty() {
        return Err(DomainError::validation("nothing to save"));
    }

    Ok(InventoryRecord::new(
        RecordId::new(),
        now,
        InventoryRecord::snapshot_label(now),
        RecordKind::Snapshot,
        items.iter().map(InventoryRecordItem::snapshot).collect(),
    ))
}

/// Manual reset: every location of every item set to zero, no history record.
pub fn reset_all_stocks(items: &[InventoryItem]) -> Vec<InventoryItem> {
    items
        .iter()
        .cloned()
        .map(|mut item| {
            item.zero_all_locations();
            item
        })
        .collect()
}
