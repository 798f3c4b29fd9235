//! Infrastructure layer: stores and the application services that drive the
//! domain crates through them.

pub mod services;
pub mod store;
