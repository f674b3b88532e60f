//! Access control for Axum
//!
//! Every protected request goes through [`Gate::authenticate`]: the bearer
//! token is verified and its subject is re-resolved against the credential
//! store, so a token held by a since-deleted user is rejected immediately.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use newsdesk_db::{Database, DbError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::AuthError;
use crate::jwt::JwtManager;

/// Authenticated user information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Extract bearer token from authorization header
fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Token verification plus live user lookup
pub struct Gate {
    jwt: Arc<JwtManager>,
    db: Database,
    lookup_timeout: Duration,
}

impl Gate {
    pub fn new(jwt: Arc<JwtManager>, db: Database, lookup_timeout: Duration) -> Self {
        Self {
            jwt,
            db,
            lookup_timeout,
        }
    }

    /// Authenticate the value of an `Authorization` header
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<AuthUser, AuthError> {
        let header = authorization.ok_or(AuthError::MissingAuthHeader)?;
        let token = extract_bearer_token(header)?;
        let claims = self.jwt.validate_token(token)?;
        let user_id = claims.user_id()?;

        let user = tokio::time::timeout(self.lookup_timeout, self.db.get_user_by_id(user_id))
            .await
            .map_err(|_| AuthError::Database(DbError::Timeout))??
            .ok_or(AuthError::UserNotFound)?;

        debug!("Authenticated user: {} ({})", user.id, user.email);

        Ok(AuthUser {
            id: user.id,
            name: user.name,
            email: user.email,
        })
    }

    async fn authenticate_parts(&self, parts: &Parts) -> Result<AuthUser, AuthError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|h| h.to_str().map_err(|_| AuthError::InvalidAuthHeader))
            .transpose()?;

        self.authenticate(header).await.inspect_err(|e| {
            if e.is_unauthorized() {
                metrics::counter!("newsdesk_auth_rejections_total").increment(1);
                debug!("Rejected request to {}: {}", parts.uri.path(), e);
            }
        })
    }
}

/// Authentication middleware
///
/// Rejects the request with 401 unless it carries a valid bearer token for an
/// existing user. On success the [`AuthUser`] is added to request extensions.
pub async fn auth_middleware(
    State(gate): State<Arc<Gate>>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let (mut parts, body) = request.into_parts();
    let user = gate.authenticate_parts(&parts).await?;

    parts.extensions.insert(user);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<Gate>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already resolved by `auth_middleware`
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let gate = Arc::<Gate>::from_ref(state);
        let user = gate.authenticate_parts(parts).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_password;
    use newsdesk_db::NewUser;

    async fn setup() -> (Gate, Arc<JwtManager>, Database, i64) {
        let db = Database::in_memory().await.unwrap();
        let user = db
            .insert_user(NewUser {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                password_hash: hash_password("pw123456").unwrap(),
            })
            .await
            .unwrap();
        let jwt = Arc::new(JwtManager::new("gate-secret", 1));
        let gate = Gate::new(jwt.clone(), db.clone(), Duration::from_secs(5));
        (gate, jwt, db, user.id)
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_bearer_token("Basic dXNlcjpwYXNz").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
        assert!(extract_bearer_token("Bearer    ").is_err());
        assert!(extract_bearer_token("abc.def.ghi").is_err());
    }

    #[tokio::test]
    async fn test_authenticate_valid_token() {
        let (gate, jwt, _db, user_id) = setup().await;
        let token = jwt.issue_token(user_id, "A", "a@x.com").unwrap();

        let user = gate
            .authenticate(Some(&format!("Bearer {}", token)))
            .await
            .unwrap();

        assert_eq!(
            user,
            AuthUser {
                id: user_id,
                name: "A".to_string(),
                email: "a@x.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_authenticate_rejects_missing_and_malformed_headers() {
        let (gate, _jwt, _db, _user_id) = setup().await;

        assert!(matches!(
            gate.authenticate(None).await,
            Err(AuthError::MissingAuthHeader)
        ));
        assert!(matches!(
            gate.authenticate(Some("Token abc")).await,
            Err(AuthError::InvalidAuthHeader)
        ));
        assert!(gate.authenticate(Some("Bearer not-a-jwt")).await.is_err());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_deleted_user() {
        let (gate, jwt, db, user_id) = setup().await;
        let token = jwt.issue_token(user_id, "A", "a@x.com").unwrap();

        db.delete_user(user_id).await.unwrap();

        let result = gate.authenticate(Some(&format!("Bearer {}", token))).await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
        assert!(result.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn test_authenticate_reflects_current_profile() {
        let (gate, jwt, db, user_id) = setup().await;
        let token = jwt.issue_token(user_id, "A", "a@x.com").unwrap();

        db.update_user(
            user_id,
            newsdesk_db::UpdateUser {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let user = gate
            .authenticate(Some(&format!("Bearer {}", token)))
            .await
            .unwrap();
        assert_eq!(user.name, "Renamed");
    }
}
