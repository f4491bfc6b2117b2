use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::errors::ItemError;
use crate::application::use_cases::auth::AuthError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

/// Handler error: a status plus the `{ "message": ... }` body sent with it.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = ?err, "request_failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        Self::new(status, status.canonical_reason().unwrap_or("Error"))
    }
}

impl From<ItemError> for ApiError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotAuthorized(msg) => Self::new(StatusCode::FORBIDDEN, msg),
            ItemError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ItemError::Conflict(msg) => Self::new(StatusCode::CONFLICT, msg),
            ItemError::InvalidInput(msg) => Self::bad_request(msg),
            ItemError::Store(e) => Self::internal(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::CredentialsTaken | AuthError::CredentialsIncorrect => {
                Self::new(StatusCode::FORBIDDEN, err.to_string())
            }
            AuthError::Store(e) => Self::internal(e),
        }
    }
}
