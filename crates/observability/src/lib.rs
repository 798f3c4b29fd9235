//! Process-wide logging setup shared by the binaries.

pub use self::tracing::{LogFormat, init, init_with};

/// Subscriber configuration (filters, output format).
pub mod tracing;
