use std::sync::Arc;

use barstock_core::{DomainError, ItemId, LocationId, Registry};
use barstock_inventory::InventoryItem;
use barstock_reconciliation::reset_all_stocks;

use super::ServiceResult;
use crate::store::ItemStore;

/// Item CRUD and manual stock edits.
pub struct InventoryService<S> {
    store: S,
    locations: Arc<Registry<LocationId>>,
}

impl<S: ItemStore> InventoryService<S> {
    pub fn new(store: S, locations: Arc<Registry<LocationId>>) -> Self {
        Self { store, locations }
    }

    pub fn locations(&self) -> &Registry<LocationId> {
        &self.locations
    }

    /// All items, ordered by name.
    pub async fn list(&self) -> ServiceResult<Vec<InventoryItem>> {
        let mut items = self.store.list().await?;
        items.sort_by_key(|i| i.name().to_lowercase());
        Ok(items)
    }

    pub async fn get(&self, id: ItemId) -> ServiceResult<InventoryItem> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("inventory item").into())
    }

    /// Create or replace an item.
    pub async fn save(&self, item: InventoryItem) -> ServiceResult<InventoryItem> {
        item.validate(&self.locations)?;
        let saved = self.store.save(item).await?;
        tracing::info!(item_id = %saved.id_typed(), name = saved.name(), "inventory item saved");
        Ok(saved)
    }

    /// Record a manual count for one location.
    pub async fn set_stock(
        &self,
        id: ItemId,
        location: &str,
        quantity: f64,
    ) -> ServiceResult<InventoryItem> {
        let location = self.locations.resolve(location)?;
        let mut item = self.get(id).await?;
        item.set_stock(location.clone(), quantity)?;
        let saved = self.store.save(item).await?;
        tracing::info!(item_id = %id, %location, quantity, "stock count updated");
        Ok(saved)
    }

    pub async fn delete(&self, id: ItemId) -> ServiceResult<()> {
        if !self.store.delete(id).await? {
            return Err(DomainError::not_found("inventory item").into());
        }
        tracing::info!(item_id = %id, "inventory item deleted");
        Ok(())
    }

    /// Operator reset: every location of every item set to zero. No history
    /// record is written.
    pub async fn reset_all(&self) -> ServiceResult<Vec<InventoryItem>> {
        let items = self.store.list().await?;
        let mut saved = Vec::with_capacity(items.len());
        for item in reset_all_stocks(&items) {
            match self.store.save(item).await {
                Ok(item) => saved.push(item),
                Err(e) => {
                    tracing::warn!(
                        reset = saved.len(),
                        remaining = items.len() - saved.len(),
                        error = %e,
                        "manual stock reset interrupted; earlier items stay zeroed"
                    );
                    return Err(e.into());
                }
            }
        }
        tracing::warn!(items = saved.len(), "manual stock reset applied");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::services::ServiceError;
    use crate::store::{InMemoryStore, StoreError, StoreResult};

    /// Item store that accepts a fixed number of writes, then fails.
    struct WritesThenFails {
        inner: Arc<InMemoryStore<InventoryItem>>,
        writes_left: AtomicUsize,
    }

    #[async_trait]
    impl ItemStore for WritesThenFails {
        async fn list(&self) -> StoreResult<Vec<InventoryItem>> {
            ItemStore::list(&self.inner).await
        }

        async fn get(&self, id: ItemId) -> StoreResult<Option<InventoryItem>> {
            ItemStore::get(&self.inner, id).await
        }

        async fn save(&self, item: InventoryItem) -> StoreResult<InventoryItem> {
            let left = self.writes_left.load(Ordering::SeqCst);
            if left == 0 {
                return Err(StoreError::Write("connection reset".to_string()));
            }
            self.writes_left.store(left - 1, Ordering::SeqCst);
            ItemStore::save(&self.inner, item).await
        }

        async fn delete(&self, id: ItemId) -> StoreResult<bool> {
            ItemStore::delete(&self.inner, id).await
        }
    }

    fn service() -> InventoryService<Arc<InMemoryStore<InventoryItem>>> {
        let locations = Registry::new(["almacen", "barra", "camara"])
            .unwrap()
            .with_primary("almacen")
            .unwrap();
        InventoryService::new(Arc::new(InMemoryStore::new()), Arc::new(locations))
    }

    fn item(name: &str) -> InventoryItem {
        InventoryItem::new(ItemId::new(), name, "Bebidas", "botella")
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let svc = service();
        svc.save(item("tonica")).await.unwrap();
        svc.save(item("Absolut")).await.unwrap();
        svc.save(item("Cola")).await.unwrap();

        let names: Vec<String> = svc
            .list()
            .await
            .unwrap()
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        assert_eq!(names, vec!["Absolut", "Cola", "tonica"]);
    }

    #[tokio::test]
    async fn invalid_item_is_not_written() {
        let svc = service();
        let err = svc.save(item("")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_stock_resolves_location_against_registry() {
        let svc = service();
        let saved = svc.save(item("Tonica")).await.unwrap();

        let updated = svc.set_stock(saved.id_typed(), "Barra", 24.0).await.unwrap();
        assert_eq!(updated.total_stock(), 24.0);

        let err = svc.set_stock(saved.id_typed(), "sotano", 1.0).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
        assert_eq!(svc.get(saved.id_typed()).await.unwrap().total_stock(), 24.0);
    }

    #[tokio::test]
    async fn missing_items_are_not_found() {
        let svc = service();
        let err = svc.set_stock(ItemId::new(), "barra", 1.0).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotFound(_))));

        let err = svc.delete(ItemId::new()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn reset_all_zeroes_every_item() {
        let svc = service();
        let a = svc.save(item("Tonica")).await.unwrap();
        let b = svc.save(item("Cola")).await.unwrap();
        svc.set_stock(a.id_typed(), "barra", 5.0).await.unwrap();
        svc.set_stock(b.id_typed(), "camara", 7.0).await.unwrap();

        let reset = svc.reset_all().await.unwrap();

        assert_eq!(reset.len(), 2);
        for item in svc.list().await.unwrap() {
            assert_eq!(item.total_stock(), 0.0);
            assert_eq!(item.stock_by_location().len(), 1);
        }
    }

    #[tokio::test]
    async fn interrupted_reset_keeps_already_zeroed_items() {
        let inner = Arc::new(InMemoryStore::<InventoryItem>::new());
        let barra = LocationId::new("barra");
        for name in ["Tonica", "Cola", "Absolut"] {
            let stocked = item(name).with_stock(barstock_inventory::StockByLocation::single(
                barra.clone(),
                4.0,
            ));
            ItemStore::save(&inner, stocked).await.unwrap();
        }
        let locations = Registry::new(["almacen", "barra"]).unwrap();
        let svc = InventoryService::new(
            WritesThenFails {
                inner: inner.clone(),
                writes_left: AtomicUsize::new(1),
            },
            Arc::new(locations),
        );

        let err = svc.reset_all().await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Write(_))));

        let totals: Vec<f64> = ItemStore::list(&inner)
            .await
            .unwrap()
            .iter()
            .map(|i| i.total_stock())
            .collect();
        assert_eq!(totals.iter().filter(|t| **t == 0.0).count(), 1);
        assert_eq!(totals.iter().filter(|t| **t == 4.0).count(), 2);
    }
}
