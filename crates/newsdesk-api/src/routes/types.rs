//! Request/Response DTOs
//!
//! Response field names follow the document-store conventions clients of
//! this API expect: `_id`, `createdAt`, `updatedAt`.

use newsdesk_db::{CommentDetail, News, NewsDetail, User, UserSummary};
use serde::{Deserialize, Serialize};

// ==================== Common Types ====================

/// Plain message response
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ==================== Auth Types ====================

/// Login request
///
/// Fields are optional so a missing one is reported as 400, not as a
/// deserialization failure.
#[derive(Deserialize, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub token: String,
}

// ==================== User Types ====================

/// Registration request
#[derive(Deserialize, Default)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Update user request
#[derive(Deserialize, Default)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// User response (without password)
#[derive(Serialize)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// User reference rendered in place of an id
#[derive(Serialize)]
pub struct UserRef {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// A reference to a user: the bare id, the populated user, or `null` when
/// the populated user no longer exists
#[derive(Serialize)]
#[serde(untagged)]
pub enum Reference {
    Id(i64),
    User(UserRef),
    Missing,
}

impl From<Option<UserSummary>> for Reference {
    fn from(user: Option<UserSummary>) -> Self {
        match user {
            Some(u) => Reference::User(UserRef {
                id: u.id,
                name: u.name,
                email: u.email,
            }),
            None => Reference::Missing,
        }
    }
}

// ==================== News Types ====================

/// Create or update news request
#[derive(Deserialize, Default)]
pub struct NewsRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Add comment request
#[derive(Deserialize, Default)]
pub struct CommentRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// News list query parameters
///
/// Kept as strings so that unparseable values fall back to the defaults.
#[derive(Deserialize, Default)]
pub struct NewsListQuery {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// Comment response
#[derive(Serialize)]
pub struct CommentResponse {
    #[serde(rename = "_id")]
    pub id: i64,
    pub text: String,
    pub user_id: Reference,
    pub timestamp: String,
}

impl From<CommentDetail> for CommentResponse {
    fn from(detail: CommentDetail) -> Self {
        Self {
            id: detail.comment.id,
            text: detail.comment.text,
            user_id: detail.user.into(),
            timestamp: detail.comment.timestamp.to_rfc3339(),
        }
    }
}

/// News response
#[derive(Serialize)]
pub struct NewsResponse {
    #[serde(rename = "_id")]
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: Reference,
    pub comments: Vec<CommentResponse>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<News> for NewsResponse {
    fn from(news: News) -> Self {
        Self {
            id: news.id,
            title: news.title,
            body: news.body,
            author_id: Reference::Id(news.author_id),
            comments: Vec::new(),
            created_at: news.created_at.to_rfc3339(),
            updated_at: news.updated_at.to_rfc3339(),
        }
    }
}

impl From<NewsDetail> for NewsResponse {
    fn from(detail: NewsDetail) -> Self {
        Self {
            id: detail.news.id,
            title: detail.news.title,
            body: detail.news.body,
            author_id: detail.author.into(),
            comments: detail.comments.into_iter().map(Into::into).collect(),
            created_at: detail.news.created_at.to_rfc3339(),
            updated_at: detail.news.updated_at.to_rfc3339(),
        }
    }
}

/// Paginated news list response
#[derive(Serialize)]
pub struct NewsListResponse {
    pub news: Vec<NewsResponse>,
    pub page: i64,
    pub pages: i64,
    pub total: i64,
}
