use recon_common::{FraudStatus, TransactionStatus};
use thiserror::Error;

use crate::{
    db_types::OrderId,
    traits::{OrderStoreError, ProcessorError, VerificationError},
};

/// Everything that can stop a notification from being reconciled.
#[derive(Debug, Clone, Error)]
pub enum ReconcileError {
    #[error("Malformed notification. {0}")]
    MalformedPayload(String),
    #[error("Notification could not be authenticated. {0}")]
    Unauthenticated(String),
    #[error("Invalid order. {0}")]
    InvalidOrder(String),
    #[error("No payment status corresponds to transaction status '{transaction_status}' (fraud status: {}) for order {order_id}", .fraud_status.as_ref().map(|f| f.as_str()).unwrap_or("none"))]
    UnhandledStatus { order_id: OrderId, transaction_status: TransactionStatus, fraud_status: Option<FraudStatus> },
    #[error("Could not save the payment status after {attempts} attempt(s). {cause}")]
    PersistenceFailure { retryable: bool, attempts: u32, cause: String },
    #[error("Could not verify the notification right now. {0}")]
    VerificationUnavailable(String),
}

impl ReconcileError {
    /// True if the same notification could succeed if delivered again later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::PersistenceFailure { retryable, .. } => *retryable,
            Self::VerificationUnavailable(_) => true,
            _ => false,
        }
    }
}

impl From<VerificationError> for ReconcileError {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::MalformedPayload(s) => Self::MalformedPayload(s),
            VerificationError::Unauthenticated(s) => Self::Unauthenticated(s),
            VerificationError::ProcessorUnavailable(s) => Self::VerificationUnavailable(s),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error("Invalid order. {0}")]
    InvalidOrder(String),
    #[error("Could not reach the payment processor. {0}")]
    TransportFailure(String),
}

impl From<ProcessorError> for QueryError {
    fn from(e: ProcessorError) -> Self {
        Self::TransportFailure(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("Invalid transaction request. {0}")]
    InvalidRequest(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Order store error. {0}")]
    StoreError(String),
    #[error("Payment processor error. {0}")]
    ProcessorError(String),
}

impl From<OrderStoreError> for CheckoutError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::OrderNotFound(id) => Self::OrderNotFound(id),
            OrderStoreError::DatabaseError(s) => Self::StoreError(s),
        }
    }
}

impl From<ProcessorError> for CheckoutError {
    fn from(e: ProcessorError) -> Self {
        Self::ProcessorError(e.to_string())
    }
}
