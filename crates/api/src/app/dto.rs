use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use barstock_core::{ItemId, SessionId};
use barstock_inventory::{InventoryItem, StockByLocation};
use barstock_purchasing::OrderLine;
use barstock_infra::services::NewPurchaseOrder;
use barstock_register::{CashSession, Expense, IncomeBySource, PaymentSplit};

// -------------------------
// Request DTOs
// -------------------------

/// Create (no `id`) or replace (with `id`) an inventory item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveItemRequest {
    pub id: Option<ItemId>,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub stock_by_location: StockByLocation,
}

impl SaveItemRequest {
    pub fn into_item(self) -> InventoryItem {
        InventoryItem::new(
            self.id.unwrap_or_default(),
            self.name,
            self.category,
            self.unit,
        )
        .with_stock(self.stock_by_location)
    }
}

#[derive(Debug, Deserialize)]
pub struct SetStockRequest {
    pub location: String,
    pub quantity: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub supplier_name: String,
    pub items: Vec<OrderLine>,
    pub order_date: Option<DateTime<Utc>>,
}

impl CreateOrderRequest {
    pub fn into_new_order(self, now: DateTime<Utc>) -> NewPurchaseOrder {
        NewPurchaseOrder {
            supplier_name: self.supplier_name,
            items: self.items,
            order_date: self.order_date.unwrap_or(now),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteOrderRequest {
    pub delivery_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteHistoryQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Create (no `id`) or replace (with `id`) a cash-register session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSessionRequest {
    pub id: Option<SessionId>,
    pub date: NaiveDate,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub income_by_source: IncomeBySource,
    #[serde(default)]
    pub payments: PaymentSplit,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    pub notes: Option<String>,
}

impl SaveSessionRequest {
    pub fn into_session(self) -> CashSession {
        let mut session = CashSession::new(self.id.unwrap_or_default(), self.date, self.label)
            .with_payments(self.payments);
        for (source, amount) in self.income_by_source.iter() {
            session = session.with_income(source.clone(), amount);
        }
        for expense in self.expenses {
            session = session.with_expense(expense.concept, expense.amount);
        }
        if let Some(notes) = self.notes {
            session = session.with_notes(notes);
        }
        session
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}
