//! Payment Reconciliation Engine
//!
//! This library holds the core logic for reconciling a payment processor's asynchronous notifications with the
//! merchant's order records. It knows nothing about HTTP; the server crate provides that layer.
//!
//! The library is divided into these sections:
//! 1. Capability traits ([`mod@traits`]). The engine talks to the order store, the processor and the notification
//!    verifier only through these, so each can be swapped for a mock or another backend.
//! 2. The order store backend ([`SqliteDatabase`]). The data types it stores are defined in [`mod@db_types`].
//! 3. The public APIs: [`ReconciliationApi`] for incoming notifications, [`StatusQueryApi`] for processor status
//!    lookups and [`CheckoutApi`] for starting new payments.
//! 4. Pure helpers ([`mod@helpers`]): the status mapping table, notification signatures and the retry combinator.
//!
//! The engine also emits events ([`mod@events`]) that other components can subscribe to. Every payment status that is
//! written to the store produces a [`events::PaymentStatusChangedEvent`].
mod db;
mod recon_api;

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{orders as sqlite_orders, SqliteDatabase};
pub use recon_api::{
    errors::{CheckoutError, QueryError, ReconcileError},
    notification_objects::{Ack, Notification, UpdateOutcome, VerifiedNotification},
    verifiers::{ProcessorConfirmedVerifier, SignatureVerifier},
    CheckoutApi,
    ReconciliationApi,
    StatusQueryApi,
};
