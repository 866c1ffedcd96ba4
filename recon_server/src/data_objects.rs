use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// The envelope for every JSON response the server sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { status: ResponseStatus::Success, message: Some(message.to_string()), data: None }
    }

    pub fn success_with_data(data: Value) -> Self {
        Self { status: ResponseStatus::Success, message: None, data: Some(data) }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { status: ResponseStatus::Error, message: Some(message.to_string()), data: None }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusQueryParams {
    #[serde(default)]
    pub order_id: String,
    /// When true, the processor's answer is also applied to the stored order.
    #[serde(default)]
    pub sync: bool,
}
