//! News and comment routes
//!
//! The whole resource sits behind `auth_middleware`; handlers read the caller
//! from the `AuthUser` it attaches.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, patch},
};
use newsdesk_auth::{AuthUser, Gate, auth_middleware};
use newsdesk_db::{DbError, NewComment, NewNews, NewsQuery, UpdateNews};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery, IdParam};
use crate::state::AppState;

use super::types::{
    CommentRequest, MessageResponse, NewsListQuery, NewsListResponse, NewsRequest, NewsResponse,
};
use super::validation::{provided, required};

/// Default page size of the news list
const DEFAULT_LIMIT: i64 = 10;
/// Largest page size a client may request
const MAX_LIMIT: i64 = 100;

fn news_not_found() -> ApiError {
    ApiError::NotFound("News not found".to_string())
}

fn map_not_found(err: DbError) -> ApiError {
    match err {
        DbError::NotFound(_) => news_not_found(),
        e => ApiError::Database(e),
    }
}

/// Parse a positive integer query value, falling back to `default`
fn positive_or(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

/// GET /api/news
async fn list_news(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NewsListQuery>,
) -> Result<Json<NewsListResponse>, ApiError> {
    let page = positive_or(query.page.as_deref(), 1);
    let limit = positive_or(query.limit.as_deref(), DEFAULT_LIMIT).min(MAX_LIMIT);

    let (news, total) = state
        .db
        .list_news(NewsQuery {
            keyword: query.keyword,
            offset: (page - 1).saturating_mul(limit),
            limit,
        })
        .await?;

    Ok(Json(NewsListResponse {
        news: news.into_iter().map(NewsResponse::from).collect(),
        page,
        pages: (total + limit - 1) / limit,
        total,
    }))
}

/// GET /api/news/{id}
async fn get_news(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<Json<NewsResponse>, ApiError> {
    let detail = state
        .db
        .get_news_detail(id)
        .await?
        .ok_or_else(news_not_found)?;

    Ok(Json(detail.into()))
}

/// POST /api/news
async fn create_news(
    author: AuthUser,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewsRequest>,
) -> Result<(StatusCode, Json<NewsResponse>), ApiError> {
    let title = required(request.title, "Title")?;
    let body = required(request.body, "Body")?;

    let news = state
        .db
        .insert_news(NewNews {
            title,
            body,
            author_id: author.id,
        })
        .await?;

    info!("User {} created news {}", author.id, news.id);

    Ok((StatusCode::CREATED, Json(news.into())))
}

/// PUT /api/news/{id}
async fn update_news(
    caller: AuthUser,
    State(state): State<AppState>,
    IdParam(id): IdParam,
    ApiJson(request): ApiJson<NewsRequest>,
) -> Result<Json<NewsResponse>, ApiError> {
    debug!("User {} updating news {}", caller.id, id);

    state
        .db
        .update_news(
            id,
            UpdateNews {
                title: provided(request.title),
                body: provided(request.body),
            },
        )
        .await
        .map_err(map_not_found)?;

    let detail = state
        .db
        .get_news_detail(id)
        .await?
        .ok_or_else(news_not_found)?;

    info!("Updated news {}", id);
    Ok(Json(detail.into()))
}

/// DELETE /api/news/{id}
async fn delete_news(
    caller: AuthUser,
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<Json<MessageResponse>, ApiError> {
    state.db.delete_news(id).await.map_err(map_not_found)?;

    info!("User {} deleted news {}", caller.id, id);
    Ok(Json(MessageResponse::new("News removed")))
}

/// PATCH /api/news/{id}/comment
async fn add_comment(
    commenter: AuthUser,
    State(state): State<AppState>,
    IdParam(id): IdParam,
    ApiJson(request): ApiJson<CommentRequest>,
) -> Result<(StatusCode, Json<NewsResponse>), ApiError> {
    let text = required(request.text, "Text")?;

    let comment = state
        .db
        .insert_comment(
            id,
            NewComment {
                text,
                user_id: commenter.id,
            },
        )
        .await
        .map_err(map_not_found)?;

    debug!("User {} commented on news {}", commenter.id, comment.news_id);

    let detail = state
        .db
        .get_news_detail(id)
        .await?
        .ok_or_else(news_not_found)?;

    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// Create news routes, all protected by the access-control gate
pub fn routes(gate: Arc<Gate>) -> Router<AppState> {
    Router::new()
        .route("/api/news", get(list_news).post(create_news))
        .route(
            "/api/news/{id}",
            get(get_news).put(update_news).delete(delete_news),
        )
        .route("/api/news/{id}/comment", patch(add_comment))
        .route_layer(middleware::from_fn_with_state(gate, auth_middleware))
}
