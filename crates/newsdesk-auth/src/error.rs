//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use newsdesk_db::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message returned for every rejected credential or token
///
/// The response never says whether the header was missing, the signature bad,
/// the token expired or the user deleted.
pub const UNAUTHORIZED_MESSAGE: &str = "Not authorized";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    #[error("User not found")]
    UserNotFound,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl AuthError {
    /// Whether this error is a rejected credential rather than a server fault
    pub fn is_unauthorized(&self) -> bool {
        !matches!(self, AuthError::PasswordHash(_) | AuthError::Database(_))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = if self.is_unauthorized() {
            (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE)
        } else {
            error!("Authentication failed internally: {}", self);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        };

        let body = axum::Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}
