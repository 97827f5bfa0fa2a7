use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::models::TransitionError;
use crate::store::StoreError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Payment required: {0}")]
    PaymentRequired(String),

    #[error("Store error")]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            AppError::PaymentRequired(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidTransition(_) => "INVALID_TRANSITION",
            AppError::PaymentRequired(_) => "PAYMENT_REQUIRED",
            AppError::Store(_) => "STORE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::Store(e) => {
                error!(error = ?e, "store error");
            }
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidTransition(msg)
            | AppError::PaymentRequired(msg) => {
                warn!(code = self.code(), message = %msg, "request rejected");
            }
        }
    }
}

// The one 402 in the lifecycle is "use before pay"; every other rejected
// transition is a plain conflict.
impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::PaymentRequired => AppError::PaymentRequired(err.to_string()),
            _ => AppError::InvalidTransition(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Store failures keep their detail server-side only.
        let public_message = match &self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidTransition(msg)
            | AppError::PaymentRequired(msg) => msg.clone(),
            AppError::Store(_) => "A storage error occurred".to_string(),
        };

        // Internal detail is never exposed in the API response.
        error_response(code, public_message, None, status)
    }
}
