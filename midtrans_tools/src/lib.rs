//! # Midtrans tools
//!
//! A thin client for the parts of the Midtrans payment processor API that the reconciliation gateway consumes:
//! * the Core API transaction status lookup, and
//! * the Snap transaction token endpoint, used to create new transaction intents.
//!
//! The client knows nothing about orders or reconciliation. Those concerns live in `recon_engine`, and the server
//! adapts [`MidtransApi`] to the engine's processor trait.
mod api;
mod config;
mod error;

pub mod data_objects;

pub use api::MidtransApi;
pub use config::{MidtransConfig, MidtransEnvironment};
pub use data_objects::{
    CustomerDetails,
    ItemDetails,
    SnapTransaction,
    TransactionDetails,
    TransactionRequest,
    TransactionStatusResponse,
};
pub use error::MidtransApiError;
