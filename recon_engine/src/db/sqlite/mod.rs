//! # SQLite order store
//!
//! The low-level queries live in [`orders`] as plain functions that take a `&mut SqliteConnection`, so callers can run
//! them on a pooled connection or inside a transaction without any other changes. [`SqliteDatabase`] wires them up to
//! the [`crate::traits::OrderStore`] trait.
use std::{str::FromStr, time::Duration};

use log::*;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod orders;
mod sqlite_impl;

pub use sqlite_impl::SqliteDatabase;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Concurrent notifications for the same order race on the same row. WAL mode plus a busy timeout lets SQLite queue
/// those writers instead of failing them straight away.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await?;
    info!("🗃️ Connected to {url} with up to {max_connections} connections");
    Ok(pool)
}
