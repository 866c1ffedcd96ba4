use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use recon_engine::{CheckoutError, QueryError, ReconcileError};
use thiserror::Error;

use crate::data_objects::JsonResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Invalid content type")]
    InvalidContentType,
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("{0}")]
    Reconcile(#[from] ReconcileError),
    #[error("{0}")]
    Query(#[from] QueryError),
    #[error("{0}")]
    Checkout(#[from] CheckoutError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidContentType => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::Reconcile(e) => match e {
                ReconcileError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
                ReconcileError::InvalidOrder(_) => StatusCode::BAD_REQUEST,
                ReconcileError::UnhandledStatus { .. } => StatusCode::BAD_REQUEST,
                ReconcileError::Unauthenticated(_) => StatusCode::FORBIDDEN,
                ReconcileError::PersistenceFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                ReconcileError::VerificationUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Query(e) => match e {
                QueryError::InvalidOrder(_) => StatusCode::BAD_REQUEST,
                QueryError::TransportFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Checkout(e) => match e {
                CheckoutError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                CheckoutError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                CheckoutError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                CheckoutError::ProcessorError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = JsonResponse::failure(self);
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::to_string(&body).unwrap_or_else(|_| r#"{"status":"error"}"#.to_string()))
    }
}
