//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Normalized (lower-case) login email
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Already-hashed password; plaintext never reaches this layer
    pub password_hash: String,
}

/// Update user (for partial updates)
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Public projection of a user, used when populating references
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// News article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New news article (for insertion)
#[derive(Debug, Clone)]
pub struct NewNews {
    pub title: String,
    pub body: String,
    pub author_id: i64,
}

/// Update news (for partial updates)
#[derive(Debug, Clone, Default)]
pub struct UpdateNews {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Comment attached to a news article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub news_id: i64,
    pub text: String,
    pub user_id: i64,
    pub timestamp: DateTime<Utc>,
}

/// New comment (for insertion)
#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub user_id: i64,
}

/// Comment together with its (possibly deleted) author
#[derive(Debug, Clone)]
pub struct CommentDetail {
    pub comment: Comment,
    /// `None` when the commenting user no longer exists
    pub user: Option<UserSummary>,
}

/// News article with its author and comments resolved
#[derive(Debug, Clone)]
pub struct NewsDetail {
    pub news: News,
    /// `None` when the author no longer exists
    pub author: Option<UserSummary>,
    pub comments: Vec<CommentDetail>,
}

impl UserSummary {
    /// Read a joined user projection, `None` if the join found no user
    pub(crate) fn from_joined(
        row: &SqliteRow,
        id_column: &str,
        name_column: &str,
        email_column: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let name: Option<String> = row.try_get(name_column)?;
        let email: Option<String> = row.try_get(email_column)?;
        Ok(match (name, email) {
            (Some(name), Some(email)) => Some(UserSummary {
                id: row.try_get(id_column)?,
                name,
                email,
            }),
            _ => None,
        })
    }
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&SqliteRow> for News {
    type Error = sqlx::Error;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(News {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            body: row.try_get("body")?,
            author_id: row.try_get("author_id")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&SqliteRow> for Comment {
    type Error = sqlx::Error;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: row.try_get("id")?,
            news_id: row.try_get("news_id")?,
            text: row.try_get("text")?,
            user_id: row.try_get("user_id")?,
            timestamp: parse_datetime_or_now(&row.try_get::<String, _>("timestamp")?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_omits_password_hash() {
        let now = Utc::now();
        let user = User {
            id: 7,
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2id"));
        assert_eq!(json["email"], "a@x.com");
    }
}
