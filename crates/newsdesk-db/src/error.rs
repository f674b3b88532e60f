//! Database error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Database operation timed out")]
    Timeout,
}

impl DbError {
    /// Map a write failure, turning unique-constraint violations into `Duplicate`
    pub(crate) fn from_write(err: sqlx::Error, duplicate_message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::Duplicate(duplicate_message.to_string())
            }
            sqlx::Error::PoolTimedOut => DbError::Timeout,
            _ => DbError::Connection(err),
        }
    }
}
