//! Adapts the Midtrans client to the engine's [`PaymentProcessor`] trait.
use log::*;
use midtrans_tools::{
    CustomerDetails,
    ItemDetails,
    MidtransApi,
    MidtransApiError,
    MidtransConfig,
    TransactionDetails,
    TransactionRequest,
};
use recon_engine::{
    db_types::OrderId,
    traits::{PaymentProcessor, ProcessorError, ProcessorStatusSnapshot, TransactionIntent, TransactionToken},
};

use crate::errors::ServerError;

#[derive(Clone)]
pub struct MidtransProcessor {
    api: MidtransApi,
}

impl MidtransProcessor {
    pub fn new(config: MidtransConfig) -> Result<Self, ServerError> {
        let api = MidtransApi::new(config).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self { api })
    }
}

impl PaymentProcessor for MidtransProcessor {
    async fn transaction_status(&self, order_id: &OrderId) -> Result<ProcessorStatusSnapshot, ProcessorError> {
        let value = self.api.transaction_status(order_id.as_str()).await.map_err(processor_error)?;
        Ok(ProcessorStatusSnapshot::new(value))
    }

    async fn create_transaction(&self, intent: &TransactionIntent) -> Result<TransactionToken, ProcessorError> {
        let request = transaction_request(intent);
        let snap = self.api.create_transaction(&request).await.map_err(processor_error)?;
        trace!("💳️ Snap redirect for order {}: {}", intent.order_id, snap.redirect_url);
        Ok(TransactionToken { transaction_id: intent.order_id.clone(), token: snap.token, redirect_url: snap.redirect_url })
    }
}

fn processor_error(e: MidtransApiError) -> ProcessorError {
    match e {
        // A 5xx means the processor never gave a definitive answer
        e if e.is_transient() => ProcessorError::Transport(e.to_string()),
        MidtransApiError::QueryError { status, message } => ProcessorError::Rejected { status, message },
        MidtransApiError::JsonError(s) => ProcessorError::InvalidResponse(s),
        e => ProcessorError::Transport(e.to_string()),
    }
}

pub fn transaction_request(intent: &TransactionIntent) -> TransactionRequest {
    let item_details = intent
        .items
        .iter()
        .map(|i| ItemDetails { id: i.id.clone(), price: i.price, quantity: i.quantity, name: i.name.clone() })
        .collect();
    let customer_details = intent.customer.as_ref().map(|c| CustomerDetails {
        first_name: c.first_name.clone(),
        last_name: c.last_name.clone(),
        email: c.email.clone(),
        phone: c.phone.clone(),
    });
    TransactionRequest {
        transaction_details: TransactionDetails { order_id: intent.order_id.clone(), gross_amount: intent.gross_amount },
        item_details,
        customer_details,
    }
}
