use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderId, PaymentStatus},
    recon_api::errors::CheckoutError,
    traits::{OrderStore, PaymentProcessor, TransactionIntent, TransactionToken},
};

/// `CheckoutApi` starts the payment flow for an order and lets callers read back what the store knows about it.
pub struct CheckoutApi<P, S> {
    processor: P,
    store: S,
}

impl<P, S> Debug for CheckoutApi<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi")
    }
}

impl<P, S> CheckoutApi<P, S> {
    pub fn new(processor: P, store: S) -> Self {
        Self { processor, store }
    }
}

impl<P, S> CheckoutApi<P, S>
where
    P: PaymentProcessor,
    S: OrderStore,
{
    /// Registers the order with a `pending` payment status and asks the processor for a payment token.
    ///
    /// If the order is already known it is left as it is, so a customer can retry checkout without losing a status
    /// that has since been reconciled.
    pub async fn create_transaction(&self, intent: TransactionIntent) -> Result<TransactionToken, CheckoutError> {
        let intent = validate(intent)?;
        let order_id = OrderId::from(intent.order_id.as_str());
        let new_order = NewOrder::new(order_id.clone(), intent.gross_amount).with_status(PaymentStatus::Pending);
        let (order, inserted) = self.store.insert_order(new_order).await.map_err(|e| {
            error!("💳️ Could not register order {order_id}. {e}");
            CheckoutError::from(e)
        })?;
        if inserted {
            debug!("💳️ Registered new order. {order}");
        } else {
            debug!("💳️ Order {order_id} already exists. Leaving it unchanged. {order}");
        }
        let token = self.processor.create_transaction(&intent).await.map_err(|e| {
            error!("💳️ The processor could not create a transaction for order {order_id}. {e}");
            CheckoutError::from(e)
        })?;
        info!("💳️ Created transaction for order {order_id}");
        Ok(token)
    }

    pub async fn fetch_order(&self, order_id: &str) -> Result<Order, CheckoutError> {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return Err(CheckoutError::InvalidRequest("An order id is required".into()));
        }
        let order_id = OrderId::from(order_id);
        self.store.fetch_order(&order_id).await?.ok_or(CheckoutError::OrderNotFound(order_id))
    }
}

fn validate(mut intent: TransactionIntent) -> Result<TransactionIntent, CheckoutError> {
    intent.order_id = intent.order_id.trim().to_string();
    if intent.order_id.is_empty() {
        return Err(CheckoutError::InvalidRequest("order_id must not be empty".into()));
    }
    if intent.gross_amount <= 0 {
        return Err(CheckoutError::InvalidRequest(format!(
            "gross_amount must be positive, but was {}",
            intent.gross_amount
        )));
    }
    if !intent.items.is_empty() {
        if let Some(item) = intent.items.iter().find(|i| i.price <= 0 || i.quantity == 0 || i.name.trim().is_empty()) {
            return Err(CheckoutError::InvalidRequest(format!(
                "Item '{}' must have a name, a positive price and a non-zero quantity",
                item.name
            )));
        }
        let total = intent.items_total();
        if total != Some(intent.gross_amount) {
            return Err(CheckoutError::InvalidRequest(format!(
                "The item total ({}) does not match gross_amount ({})",
                total.map(|t| t.to_string()).unwrap_or_else(|| "overflow".into()),
                intent.gross_amount
            )));
        }
    }
    Ok(intent)
}
