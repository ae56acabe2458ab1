use std::fmt::Display;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use ck_common::Cents;
use coinkeeper_engine::db_types::UserProfile;
use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize};

// No Debug on the credential-bearing requests, so a stray log line can never leak a password.
#[derive(Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExpenseRequest {
    pub title: String,
    pub category: String,
    pub amount: Cents,
    pub date: ExpenseDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBudgetRequest {
    pub category: String,
    pub limit: Cents,
}

/// The spend date of an expense, accepted either as a full RFC 3339 timestamp or as a bare `YYYY-MM-DD` date
/// (taken as midnight UTC).
#[derive(Debug, Clone, Copy)]
pub struct ExpenseDate(pub DateTime<Utc>);

impl<'de> Deserialize<'de> for ExpenseDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if let Ok(dt) = s.parse::<DateTime<Utc>>() {
            return Ok(Self(dt));
        }
        let date =
            s.parse::<NaiveDate>().map_err(|e| DeError::custom(format!("'{s}' is not a valid expense date: {e}")))?;
        Ok(Self(date.and_time(NaiveTime::MIN).and_utc()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}
