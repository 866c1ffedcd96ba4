mod notification_signature;
pub mod retry;
mod status_mapper;

pub use notification_signature::{notification_signature, signature_matches};
pub use retry::{retry_with_policy, AttemptError, Backoff, RetryError, RetryPolicy};
pub use status_mapper::{map_status, StatusMapping};
