//! Consumption report: the display view of an analysis record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use barstock_core::{DomainError, DomainResult, ItemId, RecordId};
use barstock_history::{InventoryRecord, RecordKind};

/// Consumption at or below this magnitude is treated as "nothing consumed".
pub const CONSUMPTION_EPSILON: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionLine {
    pub item_id: ItemId,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub initial_stock: f64,
    pub end_stock: f64,
    pub consumption: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionReport {
    pub record_id: RecordId,
    pub date: DateTime<Utc>,
    pub label: String,
    pub lines: Vec<ConsumptionLine>,
    pub total_consumption: f64,
}

impl ConsumptionReport {
    /// Build the report for an analysis record.
    ///
    /// Lines with negligible consumption are dropped and the rest are ordered
    /// from highest to lowest consumption. The stored record is not touched.
    pub fn from_record(record: &InventoryRecord) -> DomainResult<Self> {
        if record.kind() != RecordKind::Analysis {
            return Err(DomainError::invariant(
                "consumption is only available for analysis records",
            ));
        }

        let mut lines: Vec<ConsumptionLine> = record
            .items()
            .iter()
            .filter_map(|i| {
                let consumption = i.consumption()?;
                if consumption.abs() <= CONSUMPTION_EPSILON {
                    return None;
                }
                Some(ConsumptionLine {
                    item_id: i.item_id(),
                    name: i.name().to_string(),
                    category: i.category().to_string(),
                    unit: i.unit().to_string(),
                    initial_stock: i.initial_stock().unwrap_or(0.0),
                    end_stock: i.end_stock().unwrap_or(i.current_stock()),
                    consumption,
                })
            })
            .collect();

        lines.sort_by(|a, b| b.consumption.total_cmp(&a.consumption));
        let total_consumption = lines.iter().map(|l| l.consumption).sum();

        Ok(Self {
            record_id: record.id_typed(),
            date: record.date(),
            label: record.label().to_string(),
            lines,
            total_consumption,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{run_analysis, take_snapshot};
    use barstock_core::LocationId;
    use barstock_inventory::{InventoryItem, StockByLocation};

    fn item(name: &str, stock: f64) -> InventoryItem {
        InventoryItem::new(ItemId::new(), name, "Bebidas", "botella")
            .with_stock(StockByLocation::single(LocationId::new("barra"), stock))
    }

    fn recount(template: &InventoryItem, stock: f64) -> InventoryItem {
        template
            .clone()
            .with_stock(StockByLocation::single(LocationId::new("barra"), stock))
    }

    #[test]
    fn filters_negligible_consumption_and_sorts_descending() {
        let a = item("Tonica", 10.0);
        let b = item("Cola", 20.0);
        let c = item("Aperol", 5.0);
        let almacen = LocationId::new("almacen");

        let first = run_analysis(
            &[a.clone(), b.clone(), c.clone()],
            &[],
            &[],
            &almacen,
            Utc::now() - chrono::Duration::days(7),
        )
        .unwrap();
        let second = run_analysis(
            &[recount(&a, 7.0), recount(&b, 8.0), recount(&c, 4.9995)],
            &[],
            &[first.record],
            &almacen,
            Utc::now(),
        )
        .unwrap();

        let report = ConsumptionReport::from_record(&second.record).unwrap();
        let names: Vec<&str> = report.lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Cola", "Tonica"]);
        assert_eq!(report.total_consumption, 15.0);
        assert_eq!(second.record.items().len(), 3);
    }

    #[test]
    fn negative_consumption_is_kept() {
        let a = item("Tonica", 200.0);
        let out = run_analysis(&[a], &[], &[], &LocationId::new("almacen"), Utc::now()).unwrap();
        let report = ConsumptionReport::from_record(&out.record).unwrap();
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].consumption, -200.0);
    }

    #[test]
    fn snapshots_have_no_report() {
        let snapshot = take_snapshot(&[item("Tonica", 1.0)], Utc::now()).unwrap();
        let err = ConsumptionReport::from_record(&snapshot).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }
}
