use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewUser, User},
    traits::UserAccountError,
};

pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, UserAccountError> {
    let result: Result<User, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .fetch_one(conn)
    .await;
    match result {
        Ok(user) => {
            debug!("📝️ User [{}] inserted with id {}", user.email, user.id);
            Ok(user)
        },
        Err(sqlx::Error::Database(de)) if de.is_unique_violation() => Err(UserAccountError::EmailTaken(user.email)),
        Err(e) => Err(e.into()),
    }
}

pub async fn user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn user_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(user)
}
