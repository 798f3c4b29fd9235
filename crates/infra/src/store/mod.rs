//! Store abstractions + implementations.
//!
//! Every store is a simple independent collection. There is no transaction
//! spanning two stores.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::{PgDocumentStore, connect};
pub use r#trait::{HistoryStore, ItemStore, OrderStore, SessionStore, StoreError, StoreResult};
