use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::constants::messages;
use crate::shared::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// Infrastructure failure reported to the client with an endpoint-specific message
    #[error("{source}")]
    Masked {
        public: String,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Whether the failure was caused by the server side rather than the request
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::Storage(_)
                | AppError::Internal(_)
                | AppError::Masked { .. }
        )
    }

    /// Replace the generic 500 message with `public`, leaving client errors untouched
    pub fn with_public_message(self, public: &str) -> Self {
        match self {
            AppError::Masked { source, .. } => AppError::Masked {
                public: public.to_string(),
                source,
            },
            err if err.is_infrastructure() => AppError::Masked {
                public: public.to_string(),
                source: Box::new(err),
            },
            err => err,
        }
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::GENERIC_FAILURE.to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::GENERIC_FAILURE.to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::GENERIC_FAILURE.to_string(),
                )
            }
            AppError::Masked { public, source } => {
                let (status, _) = source.status_and_message();
                (status, public.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
