use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use barstock_core::{Entity, ItemId, OrderId, RecordId, SessionId};
use barstock_history::InventoryRecord;
use barstock_inventory::InventoryItem;
use barstock_purchasing::PurchaseOrder;
use barstock_register::CashSession;

use super::r#trait::{
    HistoryStore, ItemStore, OrderStore, SessionStore, StoreError, StoreResult,
};

/// In-memory collection keyed by entity id.
///
/// Intended for tests/dev. Ids are time-ordered, so `list` returns documents
/// roughly in creation order.
#[derive(Debug)]
pub struct InMemoryStore<T: Entity> {
    inner: RwLock<BTreeMap<T::Id, T>>,
}

impl<T: Entity> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

impl<T: Entity + Clone> InMemoryStore<T> {
    fn all(&self) -> StoreResult<Vec<T>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }

    fn find(&self, id: &T::Id) -> StoreResult<Option<T>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(id).cloned())
    }

    fn upsert(&self, value: T) -> StoreResult<T> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(*value.id(), value.clone());
        Ok(value)
    }

    fn remove(&self, id: &T::Id) -> StoreResult<bool> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(id).is_some())
    }
}

macro_rules! impl_keyed_store {
    ($store:ident, $t:ty, $id:ty) => {
        #[async_trait]
        impl $store for InMemoryStore<$t> {
            async fn list(&self) -> StoreResult<Vec<$t>> {
                self.all()
            }

            async fn get(&self, id: $id) -> StoreResult<Option<$t>> {
                self.find(&id)
            }

            async fn save(&self, value: $t) -> StoreResult<$t> {
                self.upsert(value)
            }

            async fn delete(&self, id: $id) -> StoreResult<bool> {
                self.remove(&id)
            }
        }
    };
}

impl_keyed_store!(ItemStore, InventoryItem, ItemId);
impl_keyed_store!(OrderStore, PurchaseOrder, OrderId);
impl_keyed_store!(SessionStore, CashSession, SessionId);

#[async_trait]
impl HistoryStore for InMemoryStore<InventoryRecord> {
    async fn list(&self) -> StoreResult<Vec<InventoryRecord>> {
        self.all()
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<InventoryRecord>> {
        self.find(&id)
    }

    async fn save(&self, record: InventoryRecord) -> StoreResult<InventoryRecord> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let id = record.id_typed();
        if map.contains_key(&id) {
            return Err(StoreError::Write(format!(
                "inventory record {id} already exists; history is append-only"
            )));
        }
        map.insert(id, record.clone());
        Ok(record)
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let removed = map.len() as u64;
        map.clear();
        Ok(removed)
    }
}
