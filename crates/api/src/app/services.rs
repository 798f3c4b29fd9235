//! Store selection and service wiring.
//!
//! Every service talks to its stores through trait objects so the backend is
//! a startup decision, not a type parameter of the router.

use std::sync::Arc;

use anyhow::Context;

use barstock_history::InventoryRecord;
use barstock_infra::services::{
    InventoryService, PurchasingService, ReconciliationService, RegisterService,
};
use barstock_infra::store::{
    self, HistoryStore, InMemoryStore, ItemStore, OrderStore, PgDocumentStore, SessionStore,
};
use barstock_inventory::InventoryItem;
use barstock_purchasing::PurchaseOrder;
use barstock_register::CashSession;

use crate::config::{AppConfig, StorageBackend};

pub type Items = Arc<dyn ItemStore>;
pub type Orders = Arc<dyn OrderStore>;
pub type History = Arc<dyn HistoryStore>;
pub type Sessions = Arc<dyn SessionStore>;

pub struct AppServices {
    pub inventory: InventoryService<Items>,
    pub purchasing: PurchasingService<Orders, Items>,
    pub reconciliation: ReconciliationService<Items, Orders, History>,
    pub register: RegisterService<Sessions>,
}

struct Stores {
    items: Items,
    orders: Orders,
    history: History,
    sessions: Sessions,
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let locations = config.location_registry()?;
    let reset_location = locations
        .resolve(&config.locations.primary)
        .context("primary location")?;
    let sources = config.income_source_registry()?;

    let stores = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory stores; data is lost on restart");
            in_memory_stores()
        }
        StorageBackend::Postgres => postgres_stores(config).await?,
    };

    Ok(AppServices {
        inventory: InventoryService::new(stores.items.clone(), Arc::new(locations)),
        purchasing: PurchasingService::new(stores.orders.clone(), stores.items.clone()),
        reconciliation: ReconciliationService::new(
            stores.items,
            stores.orders,
            stores.history,
            reset_location,
        ),
        register: RegisterService::new(stores.sessions, Arc::new(sources)),
    })
}

fn in_memory_stores() -> Stores {
    Stores {
        items: Arc::new(InMemoryStore::<InventoryItem>::new()),
        orders: Arc::new(InMemoryStore::<PurchaseOrder>::new()),
        history: Arc::new(InMemoryStore::<InventoryRecord>::new()),
        sessions: Arc::new(InMemoryStore::<CashSession>::new()),
    }
}

async fn postgres_stores(config: &AppConfig) -> anyhow::Result<Stores> {
    let url = config
        .storage
        .database_url
        .as_deref()
        .context("storage.database_url must be set when storage.backend = \"postgres\"")?;

    let pool = store::connect(url, config.storage.max_connections)
        .await
        .context("failed to connect to Postgres")?;

    Ok(Stores {
        items: Arc::new(PgDocumentStore::<InventoryItem>::items(pool.clone())),
        orders: Arc::new(PgDocumentStore::<PurchaseOrder>::orders(pool.clone())),
        history: Arc::new(PgDocumentStore::<InventoryRecord>::history(pool.clone())),
        sessions: Arc::new(PgDocumentStore::<CashSession>::sessions(pool)),
    })
}
