use thiserror::Error;

#[derive(Debug, Error)]
pub enum MidtransApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}

impl MidtransApiError {
    /// Errors that are worth retrying at a later stage, i.e. the request never got a definitive answer.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RestResponseError(_) | Self::Timeout(_) => true,
            Self::QueryError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for MidtransApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_builder() {
            Self::RestRequestError(e.to_string())
        } else if e.is_decode() {
            Self::JsonError(e.to_string())
        } else {
            Self::RestResponseError(e.to_string())
        }
    }
}
