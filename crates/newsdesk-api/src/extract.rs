//! Extractors whose rejections render as `ApiError`

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Query};
use serde::Deserialize;

use crate::error::ApiError;

/// JSON body; malformed bodies are a 400 with a JSON message
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Numeric `{id}` path segment
#[derive(FromRequestParts, Deserialize)]
#[from_request(via(Path), rejection(ApiError))]
pub struct IdParam(pub i64);

/// Query string
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    async fn echo_id(IdParam(id): IdParam) -> String {
        id.to_string()
    }

    async fn get_path(uri: &str) -> (StatusCode, String) {
        let app = Router::new().route("/items/{id}", get(echo_id));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_id_param_extracts_number() {
        let (status, body) = get_path("/items/42").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");
    }

    #[tokio::test]
    async fn test_id_param_rejects_non_numeric() {
        let (status, body) = get_path("/items/abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("\"message\""));
    }
}
