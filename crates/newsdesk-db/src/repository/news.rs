//! News and comment operations

use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::collections::HashMap;

use crate::error::DbError;
use crate::models::{
    Comment, CommentDetail, NewComment, NewNews, News, NewsDetail, UpdateNews, UserSummary,
};
use crate::repository::Database;
use crate::utils::like_pattern;

/// Query parameters for listing news
#[derive(Debug, Clone, Default)]
pub struct NewsQuery {
    /// Case-insensitive substring filter on the title
    pub keyword: Option<String>,
    /// Pagination offset
    pub offset: i64,
    /// Pagination limit
    pub limit: i64,
}

const NEWS_DETAIL_SELECT: &str = r#"
    SELECT n.id, n.title, n.body, n.author_id, n.created_at, n.updated_at,
           u.name AS author_name, u.email AS author_email
    FROM news n
    LEFT JOIN users u ON u.id = n.author_id
"#;

fn news_detail_from_row(row: &SqliteRow) -> Result<(News, Option<UserSummary>), sqlx::Error> {
    let news = News::try_from(row)?;
    let author = UserSummary::from_joined(row, "author_id", "author_name", "author_email")?;
    Ok((news, author))
}

fn not_found(id: i64) -> DbError {
    DbError::NotFound(format!("News: {}", id))
}

impl Database {
    // ==================== News Operations ====================

    /// Insert a new news article
    pub async fn insert_news(&self, news: NewNews) -> Result<News, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO news (title, title_folded, body, author_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&news.title)
        .bind(news.title.to_lowercase())
        .bind(&news.body)
        .bind(news.author_id)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(News {
            id,
            title: news.title,
            body: news.body,
            author_id: news.author_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a news article without resolving references
    pub async fn get_news(&self, id: i64) -> Result<Option<News>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, title, body, author_id, created_at, updated_at
            FROM news
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| News::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a news article with author and comment users populated
    pub async fn get_news_detail(&self, id: i64) -> Result<Option<NewsDetail>, DbError> {
        let sql = format!("{} WHERE n.id = ?", NEWS_DETAIL_SELECT);
        let Some(row) = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await? else {
            return Ok(None);
        };

        let (news, author) = news_detail_from_row(&row)?;
        let mut comments = self.comments_for(&[news.id]).await?;

        Ok(Some(NewsDetail {
            comments: comments.remove(&news.id).unwrap_or_default(),
            news,
            author,
        }))
    }

    /// List news with keyword filtering and pagination
    ///
    /// The keyword is matched against `title_folded`, the lower-cased title,
    /// so case folding covers non-ASCII letters too.
    pub async fn list_news(&self, query: NewsQuery) -> Result<(Vec<NewsDetail>, i64), DbError> {
        let pattern = query
            .keyword
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(|k| like_pattern(&k.to_lowercase()));

        let where_clause = if pattern.is_some() {
            r"WHERE n.title_folded LIKE ? ESCAPE '\'"
        } else {
            ""
        };

        // Get total count
        let count_sql = format!("SELECT COUNT(*) as count FROM news n {}", where_clause);
        let mut count_query = sqlx::query(&count_sql);
        if let Some(pattern) = &pattern {
            count_query = count_query.bind(pattern);
        }
        let count_row = count_query.fetch_one(&self.pool).await?;
        let total: i64 = count_row.get("count");

        // Get page
        let sql = format!(
            "{} {} ORDER BY n.id LIMIT ? OFFSET ?",
            NEWS_DETAIL_SELECT, where_clause
        );
        let mut page_query = sqlx::query(&sql);
        if let Some(pattern) = &pattern {
            page_query = page_query.bind(pattern);
        }
        page_query = page_query.bind(query.limit).bind(query.offset);

        let rows = page_query.fetch_all(&self.pool).await?;
        let page: Vec<(News, Option<UserSummary>)> = rows
            .iter()
            .map(news_detail_from_row)
            .collect::<Result<_, _>>()?;

        let ids: Vec<i64> = page.iter().map(|(news, _)| news.id).collect();
        let mut comments = self.comments_for(&ids).await?;

        let details = page
            .into_iter()
            .map(|(news, author)| NewsDetail {
                comments: comments.remove(&news.id).unwrap_or_default(),
                news,
                author,
            })
            .collect();

        Ok((details, total))
    }

    /// Apply a partial update to a news article
    pub async fn update_news(&self, id: i64, update: UpdateNews) -> Result<News, DbError> {
        let mut news = self.get_news(id).await?.ok_or_else(|| not_found(id))?;

        if let Some(title) = update.title {
            news.title = title;
        }
        if let Some(body) = update.body {
            news.body = body;
        }
        news.updated_at = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE news
            SET title = ?, title_folded = ?, body = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&news.title)
        .bind(news.title.to_lowercase())
        .bind(&news.body)
        .bind(news.updated_at.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(news)
    }

    /// Delete a news article together with its comments
    pub async fn delete_news(&self, id: i64) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM news WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        sqlx::query("DELETE FROM comments WHERE news_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // ==================== Comment Operations ====================

    /// Append a comment to a news article
    pub async fn insert_comment(&self, news_id: i64, comment: NewComment) -> Result<Comment, DbError> {
        let now = Utc::now();

        // INSERT ... SELECT only inserts when the article exists
        let result = sqlx::query(
            r#"
            INSERT INTO comments (news_id, text, user_id, timestamp)
            SELECT id, ?, ?, ? FROM news WHERE id = ?
            RETURNING id
            "#,
        )
        .bind(&comment.text)
        .bind(comment.user_id)
        .bind(now.to_rfc3339())
        .bind(news_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(news_id))?;

        let id: i64 = result.get("id");

        Ok(Comment {
            id,
            news_id,
            text: comment.text,
            user_id: comment.user_id,
            timestamp: now,
        })
    }

    /// Load comments for a set of articles, grouped by article, oldest first
    async fn comments_for(&self, news_ids: &[i64]) -> Result<HashMap<i64, Vec<CommentDetail>>, DbError> {
        let mut grouped: HashMap<i64, Vec<CommentDetail>> = HashMap::new();
        if news_ids.is_empty() {
            return Ok(grouped);
        }

        let placeholders = vec!["?"; news_ids.len()].join(", ");
        let sql = format!(
            r#"
            SELECT c.id, c.news_id, c.text, c.user_id, c.timestamp,
                   u.name AS user_name, u.email AS user_email
            FROM comments c
            LEFT JOIN users u ON u.id = c.user_id
            WHERE c.news_id IN ({})
            ORDER BY c.id
            "#,
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for id in news_ids {
            query = query.bind(*id);
        }

        for row in query.fetch_all(&self.pool).await? {
            let comment = Comment::try_from(&row)?;
            let user = UserSummary::from_joined(&row, "user_id", "user_name", "user_email")?;
            grouped
                .entry(comment.news_id)
                .or_default()
                .push(CommentDetail { comment, user });
        }

        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;

    async fn db_with_author() -> (Database, i64) {
        let db = Database::in_memory().await.unwrap();
        let user = db
            .insert_user(NewUser {
                name: "Author".to_string(),
                email: "author@news.com".to_string(),
                password_hash: "$argon2id$v=19$stub".to_string(),
            })
            .await
            .unwrap();
        (db, user.id)
    }

    fn article(title: &str, author_id: i64) -> NewNews {
        NewNews {
            title: title.to_string(),
            body: format!("Body of {}", title),
            author_id,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_news_detail() {
        let (db, author_id) = db_with_author().await;
        let news = db.insert_news(article("Breaking News", author_id)).await.unwrap();

        let detail = db.get_news_detail(news.id).await.unwrap().unwrap();
        assert_eq!(detail.news.title, "Breaking News");
        let author = detail.author.unwrap();
        assert_eq!(author.id, author_id);
        assert_eq!(author.name, "Author");
        assert!(detail.comments.is_empty());

        assert!(db.get_news_detail(news.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_news_keyword_and_pagination() {
        let (db, author_id) = db_with_author().await;
        for title in ["Rust 2024", "rust tips", "Weather", "Sports 100%", "Rusty nails"] {
            db.insert_news(article(title, author_id)).await.unwrap();
        }

        let (all, total) = db
            .list_news(NewsQuery {
                keyword: None,
                offset: 0,
                limit: 10,
            })
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(all.len(), 5);

        let (rust, total) = db
            .list_news(NewsQuery {
                keyword: Some("RUST".to_string()),
                offset: 0,
                limit: 2,
            })
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(rust.len(), 2);
        assert_eq!(rust[0].news.title, "Rust 2024");

        let (second_page, _) = db
            .list_news(NewsQuery {
                keyword: Some("rust".to_string()),
                offset: 2,
                limit: 2,
            })
            .await
            .unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].news.title, "Rusty nails");

        let (percent, total) = db
            .list_news(NewsQuery {
                keyword: Some("%".to_string()),
                offset: 0,
                limit: 10,
            })
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(percent[0].news.title, "Sports 100%");
    }

    #[tokio::test]
    async fn test_list_news_keyword_folds_non_ascii_case() {
        let (db, author_id) = db_with_author().await;
        let news = db.insert_news(article("Été à Paris", author_id)).await.unwrap();
        db.insert_news(article("Winter in Oslo", author_id)).await.unwrap();

        for keyword in ["été", "ÉTÉ", "été à", "PARIS"] {
            let (found, total) = db
                .list_news(NewsQuery {
                    keyword: Some(keyword.to_string()),
                    offset: 0,
                    limit: 10,
                })
                .await
                .unwrap();
            assert_eq!(total, 1, "keyword {:?}", keyword);
            assert_eq!(found[0].news.id, news.id);
        }

        // The folded title follows updates
        db.update_news(
            news.id,
            UpdateNews {
                title: Some("Ÿ Über".to_string()),
                body: None,
            },
        )
        .await
        .unwrap();
        let (_, total) = db
            .list_news(NewsQuery {
                keyword: Some("über".to_string()),
                offset: 0,
                limit: 10,
            })
            .await
            .unwrap();
        assert_eq!(total, 1);
        let (_, total) = db
            .list_news(NewsQuery {
                keyword: Some("été".to_string()),
                offset: 0,
                limit: 10,
            })
            .await
            .unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_update_news_partial() {
        let (db, author_id) = db_with_author().await;
        let news = db.insert_news(article("Old", author_id)).await.unwrap();

        let updated = db
            .update_news(
                news.id,
                UpdateNews {
                    title: Some("New".to_string()),
                    body: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.body, "Body of Old");

        let result = db.update_news(news.id + 1, UpdateNews::default()).await;
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_comments_and_cascading_delete() {
        let (db, author_id) = db_with_author().await;
        let news = db.insert_news(article("Commented", author_id)).await.unwrap();

        for text in ["first", "second"] {
            db.insert_comment(
                news.id,
                NewComment {
                    text: text.to_string(),
                    user_id: author_id,
                },
            )
            .await
            .unwrap();
        }

        let detail = db.get_news_detail(news.id).await.unwrap().unwrap();
        let texts: Vec<&str> = detail.comments.iter().map(|c| c.comment.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(detail.comments[0].user.as_ref().unwrap().name, "Author");

        db.delete_news(news.id).await.unwrap();
        assert!(db.get_news(news.id).await.unwrap().is_none());

        let remaining: i64 = sqlx::query("SELECT COUNT(*) as count FROM comments")
            .fetch_one(db.pool())
            .await
            .unwrap()
            .get("count");
        assert_eq!(remaining, 0);

        let result = db.delete_news(news.id).await;
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_comment_on_missing_news() {
        let (db, author_id) = db_with_author().await;

        let result = db
            .insert_comment(
                999,
                NewComment {
                    text: "orphan".to_string(),
                    user_id: author_id,
                },
            )
            .await;
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_deleted_author_renders_as_missing() {
        let (db, author_id) = db_with_author().await;
        let news = db.insert_news(article("Orphaned", author_id)).await.unwrap();

        db.delete_user(author_id).await.unwrap();

        let detail = db.get_news_detail(news.id).await.unwrap().unwrap();
        assert_eq!(detail.news.author_id, author_id);
        assert!(detail.author.is_none());
    }
}
