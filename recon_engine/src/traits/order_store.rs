use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderId, PaymentStatus},
    traits::StatusUpdate,
};

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The order {0} does not exist")]
    OrderNotFound(OrderId),
}

impl OrderStoreError {
    /// Database errors are assumed to be transient. A missing order will still be missing on the next attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DatabaseError(_))
    }
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// Stores a new order. This call is idempotent: if an order with the same id already exists it is returned
    /// unchanged, and the second parameter is `false`.
    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), OrderStoreError>;

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;

    /// Writes `status` into the payment status field of the order, unconditionally *unless* doing so would move the
    /// order backwards in its lifecycle. Writing the status an order already has is a successful no-op.
    ///
    /// The check and the write must be atomic with respect to other writers.
    ///
    /// Returns [`OrderStoreError::OrderNotFound`] if there is no such order.
    async fn update_payment_status(
        &self,
        order_id: &OrderId,
        status: PaymentStatus,
    ) -> Result<StatusUpdate, OrderStoreError>;
}
