//! User routes
//!
//! Registration is public; every other user route requires a valid token.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use newsdesk_auth::{AuthUser, hash_password_async};
use newsdesk_db::{DbError, NewUser, UpdateUser};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::{ApiJson, IdParam};
use crate::state::AppState;

use super::types::{MessageResponse, RegisterRequest, UpdateUserRequest, UserResponse};
use super::validation::{
    provided, required, validate_email, validate_name, validate_password,
};

fn user_not_found(err: DbError) -> ApiError {
    match err {
        DbError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
        DbError::Duplicate(msg) => ApiError::Conflict(msg),
        e => ApiError::Database(e),
    }
}

/// POST /api/users
async fn register_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let name = required(request.name, "Name")?;
    let email = required(request.email, "Email")?;
    let password = required(request.password, "Password")?;

    validate_name(&name)?;
    validate_email(&email)?;
    validate_password(&password)?;

    debug!("Registering user: {}", email);

    // Fail fast before paying for a hash
    if state.db.get_user_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password_async(password).await?;

    let user = state
        .db
        .insert_user(NewUser {
            name: name.trim().to_string(),
            email,
            password_hash,
        })
        .await
        .map_err(user_not_found)?;

    info!("Registered user: {}", user.id);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/users
async fn list_users(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.db.list_users().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/{id}
async fn get_user(
    _user: AuthUser,
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// PUT /api/users/{id}
async fn update_user(
    caller: AuthUser,
    State(state): State<AppState>,
    IdParam(id): IdParam,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!("User {} updating user: {}", caller.id, id);

    let name = provided(request.name);
    let email = provided(request.email);
    let password = provided(request.password);

    if let Some(name) = &name {
        validate_name(name)?;
    }
    if let Some(email) = &email {
        validate_email(email)?;
    }

    // A new password is always re-hashed, never stored as given
    let password_hash = match password {
        Some(password) => {
            validate_password(&password)?;
            Some(hash_password_async(password).await?)
        }
        None => None,
    };

    let user = state
        .db
        .update_user(
            id,
            UpdateUser {
                name: name.map(|n| n.trim().to_string()),
                email,
                password_hash,
            },
        )
        .await
        .map_err(user_not_found)?;

    info!("Updated user: {}", user.id);

    Ok(Json(user.into()))
}

/// DELETE /api/users/{id}
async fn delete_user(
    caller: AuthUser,
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!("User {} deleting user: {}", caller.id, id);

    state.db.delete_user(id).await.map_err(user_not_found)?;

    info!("Deleted user: {}", id);
    Ok(Json(MessageResponse::new("User removed")))
}

/// Create user routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(register_user).get(list_users))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
