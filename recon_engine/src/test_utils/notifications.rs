//! Builders for signed processor notifications.
use serde_json::{json, Value};

use crate::helpers::notification_signature;

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct NotificationBuilder {
    order_id: Value,
    transaction_status: String,
    fraud_status: Option<String>,
    status_code: String,
    gross_amount: String,
    transaction_id: Option<String>,
}

impl NotificationBuilder {
    pub fn new(order_id: &str, transaction_status: &str) -> Self {
        Self::with_raw_order_id(json!(order_id), transaction_status)
    }

    /// Use this to build notifications whose order id is not a string.
    pub fn with_raw_order_id(order_id: Value, transaction_status: &str) -> Self {
        Self {
            order_id,
            transaction_status: transaction_status.to_string(),
            fraud_status: None,
            status_code: status_code_for(transaction_status).to_string(),
            gross_amount: "10000.00".to_string(),
            transaction_id: None,
        }
    }

    pub fn fraud_status(mut self, fraud_status: &str) -> Self {
        self.fraud_status = Some(fraud_status.to_string());
        self
    }

    pub fn gross_amount(mut self, gross_amount: &str) -> Self {
        self.gross_amount = gross_amount.to_string();
        self
    }

    pub fn status_code(mut self, status_code: &str) -> Self {
        self.status_code = status_code.to_string();
        self
    }

    pub fn transaction_id(mut self, transaction_id: &str) -> Self {
        self.transaction_id = Some(transaction_id.to_string());
        self
    }

    /// The notification as a JSON object, with `signature_key` calculated using `server_key`.
    pub fn signed_value(&self, server_key: &str) -> Value {
        let signature =
            notification_signature(&text(&self.order_id), &self.status_code, &self.gross_amount, server_key);
        let mut value = json!({
            "order_id": self.order_id,
            "transaction_status": self.transaction_status,
            "status_code": self.status_code,
            "gross_amount": self.gross_amount,
            "signature_key": signature,
            "payment_type": "bank_transfer",
            "currency": "IDR",
        });
        if let Some(fraud) = &self.fraud_status {
            value["fraud_status"] = json!(fraud);
        }
        if let Some(txid) = &self.transaction_id {
            value["transaction_id"] = json!(txid);
        }
        value
    }

    /// The serialized notification body.
    pub fn sign(&self, server_key: &str) -> Vec<u8> {
        serde_json::to_vec(&self.signed_value(server_key)).unwrap_or_default()
    }
}

/// Signs a notification whose order id can be any JSON value.
pub fn signed_payload(order_id: Value, transaction_status: &str, fraud_status: Option<&str>, server_key: &str) -> Vec<u8> {
    let mut builder = NotificationBuilder::with_raw_order_id(order_id, transaction_status);
    if let Some(f) = fraud_status {
        builder = builder.fraud_status(f);
    }
    builder.sign(server_key)
}

fn status_code_for(transaction_status: &str) -> &'static str {
    match transaction_status {
        "capture" | "settlement" => "200",
        "pending" => "201",
        _ => "202",
    }
}
