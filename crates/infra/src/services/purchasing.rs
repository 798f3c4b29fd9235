use std::collections::HashSet;

use chrono::{DateTime, Utc};

use barstock_core::{DomainError, OrderId};
use barstock_purchasing::{OrderLine, PurchaseOrder};

use super::ServiceResult;
use crate::store::{ItemStore, OrderStore};

/// Input for placing an order.
#[derive(Debug, Clone)]
pub struct NewPurchaseOrder {
    pub supplier_name: String,
    pub items: Vec<OrderLine>,
    pub order_date: DateTime<Utc>,
}

/// Purchase order lifecycle over the order store.
pub struct PurchasingService<O, I> {
    orders: O,
    items: I,
}

impl<O: OrderStore, I: ItemStore> PurchasingService<O, I> {
    pub fn new(orders: O, items: I) -> Self {
        Self { orders, items }
    }

    /// All orders, newest first.
    pub async fn list(&self) -> ServiceResult<Vec<PurchaseOrder>> {
        let mut orders = self.orders.list().await?;
        orders.sort_by(|a, b| b.order_date().cmp(&a.order_date()));
        Ok(orders)
    }

    pub async fn get(&self, id: OrderId) -> ServiceResult<PurchaseOrder> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("purchase order").into())
    }

    /// Place a new `Pending` order. Every line must reference an existing item.
    pub async fn create(&self, input: NewPurchaseOrder) -> ServiceResult<PurchaseOrder> {
        let order = PurchaseOrder::place(
            OrderId::new(),
            input.supplier_name,
            input.items,
            input.order_date,
        )?;

        let known: HashSet<_> = self
            .items
            .list()
            .await?
            .iter()
            .map(|i| i.id_typed())
            .collect();
        if let Some(line) = order
            .items()
            .iter()
            .find(|l| !known.contains(&l.inventory_item_id))
        {
            return Err(DomainError::validation(format!(
                "unknown inventory item {}",
                line.inventory_item_id
            ))
            .into());
        }

        let saved = self.orders.save(order).await?;
        tracing::info!(
            order_id = %saved.id_typed(),
            supplier = saved.supplier_name(),
            lines = saved.items().len(),
            total = saved.total_amount(),
            "purchase order placed"
        );
        Ok(saved)
    }

    /// Goods received: `Pending -> Completed`.
    pub async fn complete(
        &self,
        id: OrderId,
        delivered_at: DateTime<Utc>,
    ) -> ServiceResult<PurchaseOrder> {
        let mut order = self.get(id).await?;
        order.complete(delivered_at)?;
        let saved = self.orders.save(order).await?;
        tracing::info!(order_id = %id, "purchase order received");
        Ok(saved)
    }

    pub async fn cancel(&self, id: OrderId) -> ServiceResult<PurchaseOrder> {
        let mut order = self.get(id).await?;
        order.cancel()?;
        let saved = self.orders.save(order).await?;
        tracing::info!(order_id = %id, "purchase order cancelled");
        Ok(saved)
    }

    pub async fn delete(&self, id: OrderId) -> ServiceResult<()> {
        if !self.orders.delete(id).await? {
            return Err(DomainError::not_found("purchase order").into());
        }
        tracing::info!(order_id = %id, "purchase order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::services::ServiceError;
    use crate::store::InMemoryStore;
    use barstock_core::ItemId;
    use barstock_inventory::InventoryItem;
    use barstock_purchasing::PurchaseOrderStatus;

    type Svc = PurchasingService<
        Arc<InMemoryStore<PurchaseOrder>>,
        Arc<InMemoryStore<InventoryItem>>,
    >;

    async fn setup() -> (Svc, ItemId) {
        let items = Arc::new(InMemoryStore::<InventoryItem>::new());
        let item = InventoryItem::new(ItemId::new(), "Absolut", "Vodka", "botella");
        ItemStore::save(&items, item.clone()).await.unwrap();
        let svc = PurchasingService::new(Arc::new(InMemoryStore::new()), items);
        (svc, item.id_typed())
    }

    fn new_order(item_id: ItemId, quantity: f64) -> NewPurchaseOrder {
        NewPurchaseOrder {
            supplier_name: "Distribuciones Norte".to_string(),
            items: vec![OrderLine::new(item_id, quantity, 11.0)],
            order_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_then_complete() {
        let (svc, item_id) = setup().await;
        let order = svc.create(new_order(item_id, 12.0)).await.unwrap();
        assert_eq!(order.status(), PurchaseOrderStatus::Pending);
        assert_eq!(order.total_amount(), 132.0);

        let done = svc.complete(order.id_typed(), Utc::now()).await.unwrap();
        assert_eq!(done.status(), PurchaseOrderStatus::Completed);
        assert!(done.delivery_date().is_some());
        assert_eq!(svc.get(order.id_typed()).await.unwrap(), done);
    }

    #[tokio::test]
    async fn rejects_unknown_items_and_bad_quantities_before_writing() {
        let (svc, item_id) = setup().await;

        let err = svc.create(new_order(ItemId::new(), 1.0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));

        let err = svc.create(new_order(item_id, 0.0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));

        let mut missing_supplier = new_order(item_id, 1.0);
        missing_supplier.supplier_name = String::new();
        assert!(svc.create(missing_supplier).await.is_err());

        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancelled_orders_cannot_be_completed() {
        let (svc, item_id) = setup().await;
        let order = svc.create(new_order(item_id, 3.0)).await.unwrap();
        svc.cancel(order.id_typed()).await.unwrap();

        let err = svc.complete(order.id_typed(), Utc::now()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvariantViolation(_))));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (svc, item_id) = setup().await;
        let mut older = new_order(item_id, 1.0);
        older.order_date = Utc::now() - chrono::Duration::days(3);
        let older = svc.create(older).await.unwrap();
        let newer = svc.create(new_order(item_id, 2.0)).await.unwrap();

        let ids: Vec<OrderId> = svc.list().await.unwrap().iter().map(|o| o.id_typed()).collect();
        assert_eq!(ids, vec![newer.id_typed(), older.id_typed()]);
    }

    #[tokio::test]
    async fn delete_missing_order_is_not_found() {
        let (svc, _) = setup().await;
        let err = svc.delete(OrderId::new()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotFound(_))));
    }
}
