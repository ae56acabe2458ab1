//! The data types that are stored in, and retrieved from, the CoinKeeper database.

use chrono::{DateTime, Utc};
use ck_common::Cents;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

//--------------------------------------        User        ----------------------------------------------------------
/// A registered CoinKeeper user.
///
/// `password_hash` holds the PHC-format Argon2 hash of the user's password. This struct is deliberately *not*
/// serializable; use [`UserProfile`] for anything that leaves the process.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public view of a [`User`], safe to return from the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self { id: user.id, name: user.name.clone(), email: user.email.clone() }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self { id: user.id, name: user.name, email: user.email }
    }
}

//--------------------------------------       NewUser      ----------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// The Argon2 PHC string, never the raw password
    pub password_hash: String,
}

impl NewUser {
    pub fn new<S: Into<String>>(name: S, email: S, password_hash: S) -> Self {
        Self { name: name.into(), email: email.into(), password_hash: password_hash.into() }
    }
}

//--------------------------------------       Expense      ----------------------------------------------------------
/// A single dated, categorized transaction owned by a user.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub category: String,
    #[sqlx(rename = "amount_cents")]
    pub amount: Cents,
    /// When the money was spent. Distinct from `created_at`, which is when the record was captured.
    pub spent_on: DateTime<Utc>,
    /// The budget this expense counts against, if the user had one for the category at capture time.
    pub budget_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewExpense    ----------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub user_id: i64,
    pub title: String,
    pub category: String,
    pub amount: Cents,
    pub spent_on: DateTime<Utc>,
}

impl NewExpense {
    pub fn new<S: Into<String>>(user_id: i64, title: S, category: S, amount: Cents, spent_on: DateTime<Utc>) -> Self {
        Self {
            user_id,
            title: title.into().trim().to_string(),
            category: category.into().trim().to_string(),
            amount,
            spent_on,
        }
    }
}

//--------------------------------------       Budget       ----------------------------------------------------------
/// A per-user, per-category monthly spending limit.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    #[sqlx(rename = "limit_cents")]
    pub limit: Cents,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewBudget     ----------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewBudget {
    pub user_id: i64,
    pub category: String,
    pub limit: Cents,
}

impl NewBudget {
    pub fn new<S: Into<String>>(user_id: i64, category: S, limit: Cents) -> Self {
        Self { user_id, category: category.into().trim().to_string(), limit }
    }
}
