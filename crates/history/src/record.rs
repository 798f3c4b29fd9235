use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use barstock_core::{Entity, ItemId, RecordId};
use barstock_inventory::{InventoryItem, StockByLocation};

const LABEL_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Kind of history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Point-in-time capture of stock levels, no consumption math.
    Snapshot,
    /// Consumption reconciliation for the period ending at the record date.
    Analysis,
}

/// Per-item figures computed by a consumption analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisFigures {
    pub current_stock: f64,
    pub pending_stock: f64,
    pub initial_stock: f64,
    pub end_stock: f64,
    pub consumption: f64,
}

/// Starting stock an item carries into the next period.
///
/// Older analysis records may lack `endStock`; snapshots never carry end or
/// initial figures. Resolution order: `Ended`, then `Initial`, then `Counted`
/// (snapshots only), else `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Baseline {
    /// Item absent from the baseline record, or no baseline record at all.
    None,
    Ended(f64),
    Initial(f64),
    Counted(f64),
}

impl Baseline {
    pub fn quantity(self) -> f64 {
        match self {
            Baseline::None => 0.0,
            Baseline::Ended(q) | Baseline::Initial(q) | Baseline::Counted(q) => q,
        }
    }
}

/// One item line of a history record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecordItem {
    item_id: ItemId,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    stock_by_location: StockByLocation,
    #[serde(default)]
    current_stock: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pending_stock: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    initial_stock: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_stock: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    consumption: Option<f64>,
}

impl InventoryRecordItem {
    /// Capture an item as counted, without consumption figures.
    pub fn snapshot(item: &InventoryItem) -> Self {
        Self {
            item_id: item.id_typed(),
            name: item.name().to_string(),
            category: item.category().to_string(),
            unit: item.unit().to_string(),
            stock_by_location: item.stock_by_location().clone(),
            current_stock: item.total_stock(),
            pending_stock: None,
            initial_stock: None,
            end_stock: None,
            consumption: None,
        }
    }

    /// Capture an item together with its analysis figures.
    pub fn analysis(item: &InventoryItem, figures: AnalysisFigures) -> Self {
        Self {
            current_stock: figures.current_stock,
            pending_stock: Some(figures.pending_stock),
            initial_stock: Some(figures.initial_stock),
            end_stock: Some(figures.end_stock),
            consumption: Some(figures.consumption),
            ..Self::snapshot(item)
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn stock_by_location(&self) -> &StockByLocation {
        &self.stock_by_location
    }

    pub fn current_stock(&self) -> f64 {
        self.current_stock
    }

    pub fn pending_stock(&self) -> Option<f64> {
        self.pending_stock
    }

    pub fn initial_stock(&self) -> Option<f64> {
        self.initial_stock
    }

    pub fn end_stock(&self) -> Option<f64> {
        self.end_stock
    }

    pub fn consumption(&self) -> Option<f64> {
        self.consumption
    }

    /// Stock this line hands over to the next period, given the kind of the
    /// record it belongs to.
    pub fn baseline(&self, kind: RecordKind) -> Baseline {
        match (self.end_stock, self.initial_stock, kind) {
            (Some(end), _, _) => Baseline::Ended(end),
            (None, Some(initial), _) => Baseline::Initial(initial),
            (None, None, RecordKind::Snapshot) => {
                Baseline::Counted(self.stock_by_location.total())
            }
            (None, None, RecordKind::Analysis) => Baseline::None,
        }
    }
}

/// Immutable history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    id: RecordId,
    date: DateTime<Utc>,
    label: String,
    #[serde(rename = "type")]
    kind: RecordKind,
    items: Vec<InventoryRecordItem>,
}

impl InventoryRecord {
    pub fn new(
        id: RecordId,
        date: DateTime<Utc>,
        label: impl Into<String>,
        kind: RecordKind,
        items: Vec<InventoryRecordItem>,
    ) -> Self {
        Self {
            id,
            date,
            label: label.into(),
            kind,
            items,
        }
    }

    pub fn analysis_label(date: DateTime<Utc>) -> String {
        format!("Análisis de consumo ({})", date.format(LABEL_DATE_FORMAT))
    }

    pub fn snapshot_label(date: DateTime<Utc>) -> String {
        format!("Recuento de inventario ({})", date.format(LABEL_DATE_FORMAT))
    }

    pub fn id_typed(&self) -> RecordId {
        self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn items(&self) -> &[InventoryRecordItem] {
        &self.items
    }

    pub fn item(&self, item_id: ItemId) -> Option<&InventoryRecordItem> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    /// Baseline stock for one item; `Baseline::None` if the item is not in this record.
    pub fn baseline_for(&self, item_id: ItemId) -> Baseline {
        self.item(item_id)
            .map(|i| i.baseline(self.kind))
            .unwrap_or(Baseline::None)
    }
}

impl Entity for InventoryRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barstock_core::LocationId;
    use chrono::TimeZone;

    fn test_item(stock: f64) -> InventoryItem {
        InventoryItem::new(ItemId::new(), "Absolut", "Vodka", "botella")
            .with_stock(StockByLocation::single(LocationId::new("barra"), stock))
    }

    fn figures(end_stock: f64) -> AnalysisFigures {
        AnalysisFigures {
            current_stock: end_stock,
            pending_stock: 12.0,
            initial_stock: 62.0,
            end_stock,
            consumption: 62.0 - end_stock,
        }
    }

    #[test]
    fn analysis_line_prefers_end_stock() {
        let line = InventoryRecordItem::analysis(&test_item(10.0), figures(10.0));
        assert_eq!(line.baseline(RecordKind::Analysis), Baseline::Ended(10.0));
    }

    #[test]
    fn older_analysis_line_falls_back_to_initial_stock() {
        let item = test_item(4.0);
        let json = serde_json::json!({
            "itemId": item.id_typed().to_string(),
            "name": "Absolut",
            "currentStock": 4.0,
            "initialStock": 30.0,
            "consumption": 26.0,
        });
        let line: InventoryRecordItem = serde_json::from_value(json).unwrap();
        assert_eq!(line.baseline(RecordKind::Analysis), Baseline::Initial(30.0));
    }

    #[test]
    fn snapshot_line_uses_counted_stock() {
        let line = InventoryRecordItem::snapshot(&test_item(7.0));
        assert_eq!(line.baseline(RecordKind::Snapshot), Baseline::Counted(7.0));
        assert_eq!(line.consumption(), None);
    }

    #[test]
    fn analysis_line_without_figures_has_no_baseline() {
        let line = InventoryRecordItem::snapshot(&test_item(7.0));
        assert_eq!(line.baseline(RecordKind::Analysis), Baseline::None);
        assert_eq!(Baseline::None.quantity(), 0.0);
    }

    #[test]
    fn baseline_for_missing_item_is_none() {
        let record = InventoryRecord::new(
            RecordId::new(),
            Utc::now(),
            "x",
            RecordKind::Analysis,
            vec![InventoryRecordItem::analysis(&test_item(1.0), figures(1.0))],
        );
        assert_eq!(record.baseline_for(ItemId::new()), Baseline::None);
    }

    #[test]
    fn labels_carry_formatted_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 21, 5, 0).unwrap();
        assert_eq!(
            InventoryRecord::analysis_label(date),
            "Análisis de consumo (09/03/2024 21:05)"
        );
        assert_eq!(
            InventoryRecord::snapshot_label(date),
            "Recuento de inventario (09/03/2024 21:05)"
        );
    }

    #[test]
    fn json_contract_round_trips() {
        let item = test_item(10.0);
        let record = InventoryRecord::new(
            RecordId::new(),
            Utc::now(),
            "Análisis de consumo",
            RecordKind::Analysis,
            vec![InventoryRecordItem::analysis(&item, figures(10.0))],
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "analysis");
        let line = &json["items"][0];
        assert_eq!(line["itemId"], item.id_typed().to_string());
        assert_eq!(line["pendingStock"], 12.0);
        assert_eq!(line["initialStock"], 62.0);
        assert_eq!(line["endStock"], 10.0);
        assert_eq!(line["consumption"], 52.0);
        assert_eq!(line["stockByLocation"]["barra"], 10.0);

        let back: InventoryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn snapshot_json_omits_analysis_fields() {
        let line = InventoryRecordItem::snapshot(&test_item(3.0));
        let json = serde_json::to_value(&line).unwrap();
        assert!(json.get("endStock").is_none());
        assert!(json.get("consumption").is_none());
        assert_eq!(json["currentStock"], 3.0);
    }
}
