mod processor_status;
mod secret;

pub mod helpers;

pub use processor_status::{FraudStatus, TransactionStatus};
pub use secret::Secret;
