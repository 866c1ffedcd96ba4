//! Order store backends.
#[cfg(feature = "sqlite")]
pub mod sqlite;
