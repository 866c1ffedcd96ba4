//! The engine's public APIs.
//!
//! * [`ReconciliationApi`] authenticates processor notifications and writes the resulting payment status to the
//!   order store.
//! * [`StatusQueryApi`] fetches the processor's record of a transaction.
//! * [`CheckoutApi`] registers orders and requests payment tokens from the processor.
mod checkout_api;
mod reconciliation_api;
mod status_query_api;

pub mod errors;
pub mod notification_objects;
pub mod verifiers;

pub use checkout_api::CheckoutApi;
pub use reconciliation_api::ReconciliationApi;
pub use status_query_api::StatusQueryApi;
