use thiserror::Error;

use crate::{
    db_types::OrderId,
    traits::{ProcessorStatusSnapshot, TransactionIntent, TransactionToken},
};

#[derive(Debug, Clone, Error)]
pub enum ProcessorError {
    #[error("Could not reach the payment processor. {0}")]
    Transport(String),
    #[error("The payment processor rejected the request. Error {status}. {message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected response from the payment processor. {0}")]
    InvalidResponse(String),
}

/// The calls the engine makes to the payment processor.
#[allow(async_fn_in_trait)]
pub trait PaymentProcessor {
    /// Fetches the processor's current record of the transaction for `order_id`.
    async fn transaction_status(&self, order_id: &OrderId) -> Result<ProcessorStatusSnapshot, ProcessorError>;

    /// Asks the processor to create a new transaction and returns the token the customer uses to pay.
    async fn create_transaction(&self, intent: &TransactionIntent) -> Result<TransactionToken, ProcessorError>;
}
