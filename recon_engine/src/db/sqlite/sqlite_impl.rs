//! `SqliteDatabase` is the SQLite implementation of [`OrderStore`].
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{new_pool, orders};
use crate::{
    db_types::{NewOrder, Order, OrderId, PaymentStatus},
    traits::{OrderStore, OrderStoreError, StatusUpdate},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Safe to call on every startup.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database schema is up to date");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("🗃️ Database connection pool closed");
    }
}

impl OrderStore for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let result = orders::idempotent_insert(order, &mut conn).await?;
        Ok(result)
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_order_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn update_payment_status(
        &self,
        order_id: &OrderId,
        status: PaymentStatus,
    ) -> Result<StatusUpdate, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        if let Some(order) = orders::update_payment_status_if_not_stale(order_id, status, &mut conn).await? {
            trace!("🗃️ Order {order_id} payment status set to {status}");
            return Ok(StatusUpdate::Applied(order));
        }
        // Nothing was written. Either the order doesn't exist, or it has moved on past `status`.
        match orders::fetch_order_by_order_id(order_id, &mut conn).await? {
            Some(order) => Ok(StatusUpdate::Superseded(order)),
            None => Err(OrderStoreError::OrderNotFound(order_id.clone())),
        }
    }
}
