use thiserror::Error;

use crate::db_types::{NewUser, User};

#[derive(Debug, Clone, Error)]
pub enum UserAccountError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A user is already registered with email address '{0}'")]
    EmailTaken(String),
    #[error("User {0} does not exist")]
    UserNotFound(i64),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

impl From<sqlx::Error> for UserAccountError {
    fn from(e: sqlx::Error) -> Self {
        UserAccountError::DatabaseError(e.to_string())
    }
}

/// The `UserManagement` trait defines behaviour for storing and retrieving CoinKeeper user accounts.
///
/// Credential handling (password hashing and verification) is *not* part of the storage backend; it lives in
/// [`UserApi`](crate::UserApi). Backends only ever see the finished password hash.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Creates a new user record. Fails with [`UserAccountError::EmailTaken`] if the email address is already in
    /// use.
    async fn create_user(&self, user: NewUser) -> Result<User, UserAccountError>;

    /// Fetches a user by email address. Emails are unique, so at most one record is returned.
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, UserAccountError>;

    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, UserAccountError>;
}
