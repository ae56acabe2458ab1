//! Registration and credential checking.

use std::fmt::Debug;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use log::debug;

use crate::{
    db_types::{NewUser, User},
    traits::{UserAccountError, UserManagement},
};

/// The `UserApi` handles account registration and credential verification.
///
/// Passwords are hashed with Argon2 here, at the API layer; storage backends only ever see the PHC hash string.
pub struct UserApi<B> {
    db: B,
}

impl<B: Debug> Debug for UserApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserApi ({:?})", self.db)
    }
}

impl<B> UserApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Registers a new user. The email is trimmed and lowercased before the uniqueness check, so addresses that
    /// differ only in case refer to the same account.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, UserAccountError> {
        let email = email.trim().to_ascii_lowercase();
        if self.db.fetch_user_by_email(&email).await?.is_some() {
            debug!("👤️ Registration rejected. {email} is already in use.");
            return Err(UserAccountError::EmailTaken(email));
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| UserAccountError::PasswordHash(e.to_string()))?
            .to_string();
        let user = self.db.create_user(NewUser::new(name.trim(), email.as_str(), hash.as_str())).await?;
        debug!("👤️ New user #{} registered with email {}", user.id, user.email);
        Ok(user)
    }

    /// Verifies an email/password pair, returning the matching user.
    ///
    /// Unknown email and wrong password both map to [`UserAccountError::InvalidCredentials`] so the response never
    /// reveals which of the two was wrong.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, UserAccountError> {
        let email = email.trim().to_ascii_lowercase();
        let user = self.db.fetch_user_by_email(&email).await?.ok_or_else(|| {
            debug!("👤️ Login failed. No account for {email}.");
            UserAccountError::InvalidCredentials
        })?;
        let parsed = PasswordHash::new(&user.password_hash).map_err(|e| UserAccountError::PasswordHash(e.to_string()))?;
        Argon2::default().verify_password(password.as_bytes(), &parsed).map_err(|_| {
            debug!("👤️ Login failed. Password mismatch for {email}.");
            UserAccountError::InvalidCredentials
        })?;
        Ok(user)
    }

    pub async fn user_by_id(&self, id: i64) -> Result<Option<User>, UserAccountError> {
        self.db.fetch_user_by_id(id).await
    }
}
