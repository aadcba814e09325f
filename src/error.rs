/*
 * Responsibility
 * - AppError for the service's own endpoints
 * - IntoResponse implementation (HTTP status / JSON error body)
 * - Authentication rejections do NOT go through here (see middleware::auth::AuthError);
 *   what reaches this type is a server-side fault
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::{UserError, context::ContextError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ContextError> for AppError {
    fn from(e: ContextError) -> Self {
        // Handler asked for an identity on a route the authenticator does not cover.
        tracing::error!(error = %e, "identity accessed outside an authenticated request");
        AppError::Internal
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        // Signature checked out but the payload is unusable: not the caller's fault.
        tracing::error!(error = %e, "verified credential has an unusable payload");
        AppError::Internal
    }
}
