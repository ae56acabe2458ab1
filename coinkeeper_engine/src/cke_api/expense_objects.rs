use std::fmt::Display;

use chrono::{DateTime, Utc};
use ck_common::Cents;
use serde::{Deserialize, Serialize};

use crate::db_types::Expense;

/// All expenses matching a query, along with the sum of their amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseListResult {
    pub total: Cents,
    pub expenses: Vec<Expense>,
}

/// Criteria for selecting expense rows. Empty fields are not filtered on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpenseQueryFilter {
    pub user_id: Option<i64>,
    pub category: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl ExpenseQueryFilter {
    pub fn for_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_category<S: Into<String>>(mut self, category: S) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.category.is_none() && self.since.is_none() && self.until.is_none()
    }
}

impl Display for ExpenseQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "No filters.")?;
            return Ok(());
        }
        if let Some(user_id) = &self.user_id {
            write!(f, "user_id: {user_id}. ")?;
        }
        if let Some(category) = &self.category {
            write!(f, "category: {category}. ")?;
        }
        if let Some(since) = &self.since {
            write!(f, "since {since}. ")?;
        }
        if let Some(until) = &self.until {
            write!(f, "until {until}. ")?;
        }
        Ok(())
    }
}
