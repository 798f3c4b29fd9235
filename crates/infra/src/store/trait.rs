use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use barstock_core::{ItemId, OrderId, RecordId, SessionId};
use barstock_history::InventoryRecord;
use barstock_inventory::InventoryItem;
use barstock_purchasing::PurchaseOrder;
use barstock_register::CashSession;

/// Store operation error.
///
/// These are **infrastructure errors** (connectivity, writes, encoding) as
/// opposed to domain errors (validation, invariants). The message carries the
/// raw reason so it can be shown to the operator unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("write failed: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Inventory item collection. `save` is an upsert by id.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<InventoryItem>>;
    async fn get(&self, id: ItemId) -> StoreResult<Option<InventoryItem>>;
    async fn save(&self, item: InventoryItem) -> StoreResult<InventoryItem>;
    /// Returns `false` if nothing was stored under `id`.
    async fn delete(&self, id: ItemId) -> StoreResult<bool>;
}

/// Purchase order collection. `save` is an upsert by id, used both for
/// creation and status transitions.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<PurchaseOrder>>;
    async fn get(&self, id: OrderId) -> StoreResult<Option<PurchaseOrder>>;
    async fn save(&self, order: PurchaseOrder) -> StoreResult<PurchaseOrder>;
    async fn delete(&self, id: OrderId) -> StoreResult<bool>;
}

/// Append-only inventory history.
///
/// `list` returns records in no particular order; callers sort by date.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<InventoryRecord>>;
    async fn get(&self, id: RecordId) -> StoreResult<Option<InventoryRecord>>;
    /// Append a record; returns the stored record.
    async fn save(&self, record: InventoryRecord) -> StoreResult<InventoryRecord>;
    /// Irreversible bulk wipe. Returns the number of records removed.
    async fn delete_all(&self) -> StoreResult<u64>;
}

/// Cash-register session collection.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<CashSession>>;
    async fn get(&self, id: SessionId) -> StoreResult<Option<CashSession>>;
    async fn save(&self, session: CashSession) -> StoreResult<CashSession>;
    async fn delete(&self, id: SessionId) -> StoreResult<bool>;
}

#[async_trait]
impl<S> ItemStore for Arc<S>
where
    S: ItemStore + ?Sized,
{
    async fn list(&self) -> StoreResult<Vec<InventoryItem>> {
        (**self).list().await
    }

    async fn get(&self, id: ItemId) -> StoreResult<Option<InventoryItem>> {
        (**self).get(id).await
    }

    async fn save(&self, item: InventoryItem) -> StoreResult<InventoryItem> {
        (**self).save(item).await
    }

    async fn delete(&self, id: ItemId) -> StoreResult<bool> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    async fn list(&self) -> StoreResult<Vec<PurchaseOrder>> {
        (**self).list().await
    }

    async fn get(&self, id: OrderId) -> StoreResult<Option<PurchaseOrder>> {
        (**self).get(id).await
    }

    async fn save(&self, order: PurchaseOrder) -> StoreResult<PurchaseOrder> {
        (**self).save(order).await
    }

    async fn delete(&self, id: OrderId) -> StoreResult<bool> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl<S> HistoryStore for Arc<S>
where
    S: HistoryStore + ?Sized,
{
    async fn list(&self) -> StoreResult<Vec<InventoryRecord>> {
        (**self).list().await
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<InventoryRecord>> {
        (**self).get(id).await
    }

    async fn save(&self, record: InventoryRecord) -> StoreResult<InventoryRecord> {
        (**self).save(record).await
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        (**self).delete_all().await
    }
}

#[async_trait]
impl<S> SessionStore for Arc<S>
where
    S: SessionStore + ?Sized,
{
    async fn list(&self) -> StoreResult<Vec<CashSession>> {
        (**self).list().await
    }

    async fn get(&self, id: SessionId) -> StoreResult<Option<CashSession>> {
        (**self).get(id).await
    }

    async fn save(&self, session: CashSession) -> StoreResult<CashSession> {
        (**self).save(session).await
    }

    async fn delete(&self, id: SessionId) -> StoreResult<bool> {
        (**self).delete(id).await
    }
}
