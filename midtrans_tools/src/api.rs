use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    config::MidtransConfig,
    data_objects::{SnapTransaction, TransactionRequest, TransactionStatusResponse},
    MidtransApiError,
};

#[derive(Clone)]
pub struct MidtransApi {
    core_api_url: String,
    snap_api_url: String,
    client: Arc<Client>,
}

impl MidtransApi {
    pub fn new(config: MidtransConfig) -> Result<Self, MidtransApiError> {
        let mut headers = HeaderMap::with_capacity(3);
        let mut auth = HeaderValue::from_str(&basic_auth_value(config.server_key.reveal()))
            .map_err(|e| MidtransApiError::Initialization(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| MidtransApiError::Initialization(e.to_string()))?;
        let core_api_url = config.environment.core_api_url().to_string();
        let snap_api_url = config.environment.snap_api_url().to_string();
        Ok(Self { core_api_url, snap_api_url, client: Arc::new(client) })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: &str) -> Self {
        self.core_api_url = base_url.to_string();
        self.snap_api_url = base_url.to_string();
        self
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: String,
        body: Option<B>,
    ) -> Result<T, MidtransApiError> {
        trace!("💳️ Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await?;
        if response.status().is_success() {
            trace!("💳️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| MidtransApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| MidtransApiError::RestResponseError(e.to_string()))?;
            Err(MidtransApiError::QueryError { status, message })
        }
    }

    /// Fetches the current status of the transaction for `order_id` from the Core API.
    ///
    /// The raw JSON response is returned so that callers can pass the processor's full record along. Responses that
    /// carry an error code in the body (the Core API does this for unknown orders) are converted into errors.
    pub async fn transaction_status(&self, order_id: &str) -> Result<Value, MidtransApiError> {
        let url = self.status_url(order_id);
        debug!("💳️ Fetching transaction status for order {order_id}");
        let value = self.rest_query::<Value, ()>(Method::GET, url, None).await?;
        let parsed = TransactionStatusResponse::from_value(&value)?;
        if let Some(err) = parsed.embedded_error() {
            debug!("💳️ Status lookup for order {order_id} failed. {err}");
            return Err(err);
        }
        info!(
            "💳️ Fetched transaction status for order {order_id}: {}",
            parsed.transaction_status.as_ref().map(|s| s.as_str()).unwrap_or("unknown")
        );
        Ok(value)
    }

    /// Requests a new Snap token for the given transaction.
    pub async fn create_transaction(&self, request: &TransactionRequest) -> Result<SnapTransaction, MidtransApiError> {
        let url = format!("{}/transactions", self.snap_api_url);
        let order_id = &request.transaction_details.order_id;
        debug!("💳️ Requesting Snap token for order {order_id}");
        let result = self.rest_query::<SnapTransaction, &TransactionRequest>(Method::POST, url, Some(request)).await?;
        info!("💳️ Snap token issued for order {order_id}");
        Ok(result)
    }

    pub fn status_url(&self, order_id: &str) -> String {
        format!("{}/v2/{}/status", self.core_api_url, urlencoding::encode(order_id))
    }
}

/// Midtrans uses HTTP basic auth with the server key as the username and an empty password.
fn basic_auth_value(server_key: &str) -> String {
    format!("Basic {}", base64::encode(format!("{server_key}:")))
}
