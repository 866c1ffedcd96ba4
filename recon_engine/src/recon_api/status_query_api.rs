use std::fmt::Debug;

use log::*;

use crate::{
    db_types::OrderId,
    recon_api::errors::QueryError,
    traits::{PaymentProcessor, ProcessorStatusSnapshot},
};

/// Read-only access to the processor's record of a transaction.
pub struct StatusQueryApi<P> {
    processor: P,
}

impl<P> Debug for StatusQueryApi<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StatusQueryApi")
    }
}

impl<P> StatusQueryApi<P> {
    pub fn new(processor: P) -> Self {
        Self { processor }
    }
}

impl<P: PaymentProcessor> StatusQueryApi<P> {
    /// Fetches the processor's current record for `order_id`. Blank ids are rejected without contacting the processor.
    /// Failures are not retried.
    pub async fn query(&self, order_id: &str) -> Result<ProcessorStatusSnapshot, QueryError> {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return Err(QueryError::InvalidOrder("An order id is required".into()));
        }
        let order_id = OrderId::from(order_id);
        trace!("💳️ Fetching transaction status for order {order_id}");
        self.processor.transaction_status(&order_id).await.map_err(|e| {
            warn!("💳️ Transaction status lookup for order {order_id} failed. {e}");
            QueryError::from(e)
        })
    }
}
