//! Newsdesk Authentication and Authorization
//!
//! This crate provides Argon2 password hashing, JWT session tokens and the
//! access-control gate that guards protected routes.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use error::{AuthError, UNAUTHORIZED_MESSAGE};
pub use jwt::{Claims, JwtManager};
pub use middleware::{AuthUser, Gate, auth_middleware};
pub use password::{
    DUMMY_HASH, hash_password, hash_password_async, verify_password, verify_password_async,
};
