//! `barstock-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod registry;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ItemId, OrderId, RecordId, SessionId};
pub use registry::{IncomeSourceId, KeyedAmounts, LocationId, Registry, RegistryKey};
