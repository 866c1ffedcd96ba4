//! # Reconciliation gateway server
//! This crate hosts the HTTP side of the reconciliation gateway. It is responsible for:
//! * Receiving payment notifications from the processor and handing them to the reconciliation engine.
//! * Exposing processor status lookups, optionally reconciling the order with the result.
//! * Creating new transactions for orders, and reporting the stored payment status of an order.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `POST /api/callback`: The processor's notification webhook.
//! * `GET /api/status?order_id=…[&sync=true]`: The processor's record of a transaction.
//! * `POST /api`: Create a new transaction and return its payment token.
//! * `GET /api/orders/{order_id}`: The stored order, including its payment status.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
