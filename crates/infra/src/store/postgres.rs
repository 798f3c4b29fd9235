//! Postgres-backed document stores.
//!
//! Each collection is a table of `(id UUID, body JSONB)` rows. The JSON body is
//! the serde form of the domain type, so field names on disk are the same
//! contract the HTTP layer exposes.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use barstock_core::{Entity, ItemId, OrderId, RecordId, SessionId};
use barstock_history::InventoryRecord;
use barstock_inventory::InventoryItem;
use barstock_purchasing::PurchaseOrder;
use barstock_register::CashSession;

use super::r#trait::{
    HistoryStore, ItemStore, OrderStore, SessionStore, StoreError, StoreResult,
};

const SCHEMA: &str = include_str!("../../migrations/0001_documents.sql");

/// Open a pool and make sure the document tables exist.
pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(unavailable)?;

    sqlx::raw_sql(SCHEMA)
        .execute(&pool)
        .await
        .map_err(unavailable)?;

    tracing::info!(max_connections, "postgres document stores ready");
    Ok(pool)
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn write_failed(e: sqlx::Error) -> StoreError {
    StoreError::Write(e.to_string())
}

/// One JSONB document table.
pub struct PgDocumentStore<T> {
    pool: PgPool,
    table: &'static str,
    _doc: PhantomData<fn() -> T>,
}

impl<T> PgDocumentStore<T> {
    fn with_table(pool: PgPool, table: &'static str) -> Self {
        Self {
            pool,
            table,
            _doc: PhantomData,
        }
    }
}

impl PgDocumentStore<InventoryItem> {
    pub fn items(pool: PgPool) -> Self {
        Self::with_table(pool, "inventory_items")
    }
}

impl PgDocumentStore<PurchaseOrder> {
    pub fn orders(pool: PgPool) -> Self {
        Self::with_table(pool, "purchase_orders")
    }
}

impl PgDocumentStore<InventoryRecord> {
    pub fn history(pool: PgPool) -> Self {
        Self::with_table(pool, "inventory_records")
    }
}

impl PgDocumentStore<CashSession> {
    pub fn sessions(pool: PgPool) -> Self {
        Self::with_table(pool, "cash_sessions")
    }
}

impl<T> PgDocumentStore<T>
where
    T: Entity + Serialize + DeserializeOwned + Send,
    T::Id: Into<Uuid>,
{
    fn decode(row: &sqlx::postgres::PgRow) -> StoreResult<T> {
        let body: serde_json::Value = row
            .try_get("body")
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        serde_json::from_value(body).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn encode(value: &T) -> StoreResult<serde_json::Value> {
        serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn all(&self) -> StoreResult<Vec<T>> {
        let sql = format!("SELECT body FROM {} ORDER BY recorded_at, id", self.table);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;
        rows.iter().map(Self::decode).collect()
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<T>> {
        let sql = format!("SELECT body FROM {} WHERE id = $1", self.table);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;
        row.as_ref().map(Self::decode).transpose()
    }

    async fn upsert(&self, value: T) -> StoreResult<T> {
        let body = Self::encode(&value)?;
        let id: Uuid = (*value.id()).into();
        let sql = format!(
            r#"
            INSERT INTO {} (id, body)
            VALUES ($1, $2)
            ON CONFLICT (id)
            DO UPDATE SET
                body = EXCLUDED.body,
                updated_at = NOW()
            "#,
            self.table
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(write_failed)?;
        Ok(value)
    }

    async fn insert(&self, value: T) -> StoreResult<T> {
        let body = Self::encode(&value)?;
        let id: Uuid = (*value.id()).into();
        let sql = format!("INSERT INTO {} (id, body) VALUES ($1, $2)", self.table);
        sqlx::query(&sql)
            .bind(id)
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(write_failed)?;
        Ok(value)
    }

    async fn remove(&self, id: Uuid) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(write_failed)?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> StoreResult<u64> {
        let sql = format!("DELETE FROM {}", self.table);
        let result = sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(write_failed)?;
        Ok(result.rows_affected())
    }
}

macro_rules! impl_pg_keyed_store {
    ($store:ident, $t:ty, $id:ty) => {
        #[async_trait]
        impl $store for PgDocumentStore<$t> {
            async fn list(&self) -> StoreResult<Vec<$t>> {
                self.all().await
            }

            async fn get(&self, id: $id) -> StoreResult<Option<$t>> {
                self.find(id.into()).await
            }

            async fn save(&self, value: $t) -> StoreResult<$t> {
                self.upsert(value).await
            }

            async fn delete(&self, id: $id) -> StoreResult<bool> {
                self.remove(id.into()).await
            }
        }
    };
}

impl_pg_keyed_store!(ItemStore, InventoryItem, ItemId);
impl_pg_keyed_store!(OrderStore, PurchaseOrder, OrderId);
impl_pg_keyed_store!(SessionStore, CashSession, SessionId);

#[async_trait]
impl HistoryStore for PgDocumentStore<InventoryRecord> {
    async fn list(&self) -> StoreResult<Vec<InventoryRecord>> {
        self.all().await
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<InventoryRecord>> {
        self.find(id.into()).await
    }

    async fn save(&self, record: InventoryRecord) -> StoreResult<InventoryRecord> {
        self.insert(record).await
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        self.clear().await
    }
}
