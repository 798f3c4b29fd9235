use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use barstock_core::{DomainError, DomainResult, Entity, ItemId, OrderId};

/// Purchase order status lifecycle.
///
/// `Pending -> Completed -> Archived`, or `Pending -> Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOrderStatus {
    Pending,
    Completed,
    Archived,
    Cancelled,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Pending => "Pending",
            PurchaseOrderStatus::Completed => "Completed",
            PurchaseOrderStatus::Archived => "Archived",
            PurchaseOrderStatus::Cancelled => "Cancelled",
        }
    }
}

/// Purchase order line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub inventory_item_id: ItemId,
    pub quantity: f64,
    pub cost_at_time_of_purchase: f64,
}

impl OrderLine {
    pub fn new(inventory_item_id: ItemId, quantity: f64, cost_at_time_of_purchase: f64) -> Self {
        Self {
            inventory_item_id,
            quantity,
            cost_at_time_of_purchase,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.quantity * self.cost_at_time_of_purchase
    }
}

/// Purchase order placed with a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    id: OrderId,
    order_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delivery_date: Option<DateTime<Utc>>,
    supplier_name: String,
    items: Vec<OrderLine>,
    status: PurchaseOrderStatus,
    total_amount: f64,
}

impl PurchaseOrder {
    /// Place a new order. The order starts `Pending`.
    pub fn place(
        id: OrderId,
        supplier_name: impl Into<String>,
        items: Vec<OrderLine>,
        order_date: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let supplier_name = supplier_name.into();
        if supplier_name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        if items.is_empty() {
            return Err(DomainError::validation(
                "purchase order needs at least one line",
            ));
        }
        for line in &items {
            if !(line.quantity.is_finite() && line.quantity > 0.0) {
                return Err(DomainError::validation(format!(
                    "quantity for item {} must be positive",
                    line.inventory_item_id
                )));
            }
            if !(line.cost_at_time_of_purchase.is_finite() && line.cost_at_time_of_purchase >= 0.0)
            {
                return Err(DomainError::validation(format!(
                    "cost for item {} cannot be negative",
                    line.inventory_item_id
                )));
            }
        }

        let total_amount = items.iter().map(OrderLine::line_total).sum();
        Ok(Self {
            id,
            order_date,
            delivery_date: None,
            supplier_name: supplier_name.trim().to_string(),
            items,
            status: PurchaseOrderStatus::Pending,
            total_amount,
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn delivery_date(&self) -> Option<DateTime<Utc>> {
        self.delivery_date
    }

    pub fn supplier_name(&self) -> &str {
        &self.supplier_name
    }

    pub fn items(&self) -> &[OrderLine] {
        &self.items
    }

    pub fn status(&self) -> PurchaseOrderStatus {
        self.status
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    /// Received but not yet folded into a consumption analysis.
    pub fn is_pending_stock(&self) -> bool {
        self.status == PurchaseOrderStatus::Completed
    }

    /// Total quantity ordered for one item (an item may appear on several lines).
    pub fn quantity_for(&self, item_id: ItemId) -> f64 {
        self.items
            .iter()
            .filter(|l| l.inventory_item_id == item_id)
            .map(|l| l.quantity)
            .sum()
    }

    /// Mark the goods as received.
    pub fn complete(&mut self, delivered_at: DateTime<Utc>) -> DomainResult<()> {
        self.transition(PurchaseOrderStatus::Pending, PurchaseOrderStatus::Completed)?;
        self.delivery_date = Some(delivered_at);
        Ok(())
    }

    /// Mark a received order as accounted for by a consumption analysis.
    pub fn archive(&mut self) -> DomainResult<()> {
        self.transition(PurchaseOrderStatus::Completed, PurchaseOrderStatus::Archived)
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        self.transition(PurchaseOrderStatus::Pending, PurchaseOrderStatus::Cancelled)
    }

    fn transition(
        &mut self,
        from: PurchaseOrderStatus,
        to: PurchaseOrderStatus,
    ) -> DomainResult<()> {
        if self.status != from {
            return Err(DomainError::invariant(format!(
                "cannot move purchase order from {} to {} (expected {})",
                self.status.as_str(),
                to.as_str(),
                from.as_str()
            )));
        }
        self.status = to;
        Ok(())
    }
}

impl Entity for PurchaseOrder {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
