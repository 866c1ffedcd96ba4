use thiserror::Error;

use crate::recon_api::notification_objects::VerifiedNotification;

#[derive(Debug, Clone, Error)]
pub enum VerificationError {
    #[error("Malformed notification. {0}")]
    MalformedPayload(String),
    #[error("Notification signature is invalid. {0}")]
    Unauthenticated(String),
    #[error("Could not confirm the notification with the payment processor. {0}")]
    ProcessorUnavailable(String),
}

/// Authenticates raw notification payloads.
///
/// Implementations must not have side effects beyond what is needed to check the payload, so that the same payload
/// can be verified any number of times.
#[allow(async_fn_in_trait)]
pub trait NotificationVerifier {
    async fn verify(&self, raw_payload: &[u8]) -> Result<VerifiedNotification, VerificationError>;
}
