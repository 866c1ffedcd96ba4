//! [`NotificationVerifier`] implementations.
use std::fmt::Debug;

use log::*;
use recon_common::{FraudStatus, Secret, TransactionStatus};
use serde_json::{Map, Value};

use crate::{
    helpers::{notification_signature, signature_matches},
    recon_api::notification_objects::{field_text, Notification, VerifiedNotification},
    traits::{NotificationVerifier, PaymentProcessor, ProcessorError, VerificationError},
};

//--------------------------------------   SignatureVerifier   ---------------------------------------------------------
/// Checks the `signature_key` field of a notification against the signature calculated with the merchant's server
/// key.
#[derive(Clone)]
pub struct SignatureVerifier {
    server_key: Secret<String>,
}

impl Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SignatureVerifier")
    }
}

impl SignatureVerifier {
    pub fn new(server_key: Secret<String>) -> Self {
        Self { server_key }
    }

    fn parse(raw_payload: &[u8]) -> Result<(Notification, String), VerificationError> {
        if raw_payload.is_empty() {
            return Err(VerificationError::MalformedPayload("The notification body is empty".into()));
        }
        let payload = serde_json::from_slice::<Value>(raw_payload)
            .map_err(|e| VerificationError::MalformedPayload(format!("The notification body is not valid JSON. {e}")))?;
        let fields = payload
            .as_object()
            .ok_or_else(|| VerificationError::MalformedPayload("The notification body is not a JSON object".into()))?;
        let order_id = required(fields, "order_id")?.clone();
        let transaction_status = required(fields, "transaction_status")?
            .as_str()
            .map(TransactionStatus::from)
            .ok_or_else(|| VerificationError::MalformedPayload("transaction_status is not a string".into()))?;
        let status_code = field_text(required(fields, "status_code")?);
        let gross_amount = field_text(required(fields, "gross_amount")?);
        let signature = required(fields, "signature_key")?
            .as_str()
            .map(String::from)
            .ok_or_else(|| VerificationError::MalformedPayload("signature_key is not a string".into()))?;
        let fraud_status = fields.get("fraud_status").and_then(Value::as_str).map(FraudStatus::from);
        let transaction_id = fields.get("transaction_id").and_then(Value::as_str).map(String::from);
        let notification = Notification {
            order_id,
            transaction_status,
            fraud_status,
            status_code,
            gross_amount,
            transaction_id,
            payload,
        };
        Ok((notification, signature))
    }
}

fn required<'a>(fields: &'a Map<String, Value>, key: &str) -> Result<&'a Value, VerificationError> {
    fields.get(key).ok_or_else(|| VerificationError::MalformedPayload(format!("The '{key}' field is missing")))
}

impl NotificationVerifier for SignatureVerifier {
    async fn verify(&self, raw_payload: &[u8]) -> Result<VerifiedNotification, VerificationError> {
        let (notification, signature) = Self::parse(raw_payload)?;
        // Anyone can compute a signature over a blank key
        if !self.server_key.is_set() {
            error!(
                "🔔️ No server key is configured. Rejecting notification for order '{}'",
                notification.order_id_text()
            );
            return Err(VerificationError::Unauthenticated("No server key is configured".into()));
        }
        let expected = notification_signature(
            &notification.order_id_text(),
            &notification.status_code,
            &notification.gross_amount,
            self.server_key.reveal(),
        );
        if !signature_matches(&expected, &signature) {
            warn!("🔔️ Signature mismatch on notification for order '{}'", notification.order_id_text());
            return Err(VerificationError::Unauthenticated(format!(
                "The signature for order '{}' does not match",
                notification.order_id_text()
            )));
        }
        trace!("🔔️ Notification for order '{}' is authentic", notification.order_id_text());
        Ok(VerifiedNotification::new(notification))
    }
}

//-------------------------------------- ProcessorConfirmedVerifier ----------------------------------------------------
/// Verifies the signature and then asks the processor for its own record of the transaction. The processor's
/// transaction and fraud statuses replace the ones in the notification.
#[derive(Clone)]
pub struct ProcessorConfirmedVerifier<P> {
    signature: SignatureVerifier,
    processor: P,
}

impl<P> Debug for ProcessorConfirmedVerifier<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProcessorConfirmedVerifier")
    }
}

impl<P> ProcessorConfirmedVerifier<P> {
    pub fn new(server_key: Secret<String>, processor: P) -> Self {
        Self { signature: SignatureVerifier::new(server_key), processor }
    }
}

impl<P: PaymentProcessor> NotificationVerifier for ProcessorConfirmedVerifier<P> {
    async fn verify(&self, raw_payload: &[u8]) -> Result<VerifiedNotification, VerificationError> {
        let verified = self.signature.verify(raw_payload).await?;
        // A bad order id is reported by the engine, there is nothing to look up
        let Some(order_id) = verified.notification().order_id() else {
            return Ok(verified);
        };
        let snapshot = self.processor.transaction_status(&order_id).await.map_err(|e| match e {
            ProcessorError::Rejected { status: 404, message } => {
                warn!("🔔️ The processor has no transaction for order {order_id}. {message}");
                VerificationError::Unauthenticated(format!("The processor has no transaction for order {order_id}"))
            },
            e => {
                warn!("🔔️ Could not confirm the notification for order {order_id} with the processor. {e}");
                VerificationError::ProcessorUnavailable(e.to_string())
            },
        })?;
        if snapshot.order_id().is_some_and(|id| id != order_id.as_str()) {
            return Err(VerificationError::Unauthenticated(format!(
                "The processor's record does not belong to order {order_id}"
            )));
        }
        let transaction_status = snapshot.transaction_status().ok_or_else(|| {
            VerificationError::ProcessorUnavailable(format!(
                "The processor's record for order {order_id} has no transaction status"
            ))
        })?;
        let mut notification = verified.into_inner();
        if notification.transaction_status != transaction_status {
            info!(
                "🔔️ Order {order_id}: notification says '{}' but the processor says '{transaction_status}'. Using the \
                 processor's status.",
                notification.transaction_status
            );
        }
        notification.transaction_status = transaction_status;
        notification.fraud_status = snapshot.fraud_status();
        Ok(VerifiedNotification::new(notification))
    }
}
