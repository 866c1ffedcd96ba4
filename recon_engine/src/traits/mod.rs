//! # Capability interfaces
//!
//! The reconciliation engine never talks to a database or the payment processor directly. Instead, it is handed
//! objects implementing these traits when it is constructed.
//!
//! * [`OrderStore`] is a keyed, durable record store for orders. Backends must make
//!   [`OrderStore::update_payment_status`] idempotent and must refuse writes that would regress an order's payment
//!   status (see [`crate::db_types::PaymentStatus::rank`]).
//! * [`NotificationVerifier`] authenticates raw notification payloads.
//! * [`PaymentProcessor`] provides the calls the engine makes to the processor: status lookups and transaction
//!   intent creation.
mod data_objects;
mod notification_verifier;
mod order_store;
mod payment_processor;

pub use data_objects::{
    CustomerInfo,
    ProcessorStatusSnapshot,
    StatusUpdate,
    TransactionIntent,
    TransactionItem,
    TransactionToken,
};
pub use notification_verifier::{NotificationVerifier, VerificationError};
pub use order_store::{OrderStore, OrderStoreError};
pub use payment_processor::{PaymentProcessor, ProcessorError};
