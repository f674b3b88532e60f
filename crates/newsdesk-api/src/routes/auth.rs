//! Login route

use axum::{Json, Router, extract::State, routing::post};
use newsdesk_auth::{AuthError, DUMMY_HASH, verify_password_async};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

use super::types::{LoginRequest, LoginResponse};
use super::validation::MAX_PASSWORD_LENGTH;

/// Record a rejected login and build the uniform 401
fn reject(email: &str) -> ApiError {
    metrics::counter!("newsdesk_logins_total", "outcome" => "rejected").increment(1);
    warn!("Rejected login for: {}", email);
    ApiError::Auth(AuthError::InvalidCredentials)
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(email), Some(password)) = (
        request.email.filter(|e| !e.trim().is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Please provide email and password".to_string(),
        ));
    };

    // No stored password is this long; skip the hash entirely
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(reject(&email));
    }

    debug!("Login attempt for: {}", email);

    // Find user - but don't return early to prevent timing attacks
    let user_result = state.db.get_user_by_email(&email).await?;

    // Verify against a dummy hash when the user doesn't exist
    let (hash_to_verify, user) = match user_result {
        Some(u) => (u.password_hash.clone(), Some(u)),
        None => (DUMMY_HASH.to_string(), None),
    };

    let password_valid = verify_password_async(password, hash_to_verify).await;

    let user = match (user, password_valid) {
        (Some(u), true) => u,
        _ => return Err(reject(&email)),
    };

    let token = state.jwt.issue_token(user.id, &user.name, &user.email)?;

    metrics::counter!("newsdesk_logins_total", "outcome" => "success").increment(1);
    info!("User {} logged in successfully", user.id);

    Ok(Json(LoginResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/auth/login", post(login))
}
