use thiserror::Error;

use crate::db_types::{Budget, NewBudget};

#[derive(Debug, Clone, Error)]
pub enum BudgetError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Budget {0} does not exist")]
    BudgetNotFound(i64),
    #[error("A budget for category '{0}' already exists")]
    DuplicateCategory(String),
    #[error("Budget {0} belongs to another user")]
    NotOwnedByUser(i64),
}

impl From<sqlx::Error> for BudgetError {
    fn from(e: sqlx::Error) -> Self {
        BudgetError::DatabaseError(e.to_string())
    }
}

/// The `BudgetManagement` trait defines behaviour for storing and querying budget records.
///
/// A budget is unique per `(user, category)` pair. Budgets apply per calendar month; the month window itself is an
/// analytics concern and never stored.
#[allow(async_fn_in_trait)]
pub trait BudgetManagement {
    /// Inserts a new budget. Fails with [`BudgetError::DuplicateCategory`] if the user already has a budget for the
    /// category.
    async fn insert_budget(&self, budget: NewBudget) -> Result<Budget, BudgetError>;

    /// Fetches all budgets for the given user, most recently created first.
    async fn fetch_budgets_for_user(&self, user_id: i64) -> Result<Vec<Budget>, BudgetError>;

    async fn fetch_budget_by_id(&self, id: i64) -> Result<Option<Budget>, BudgetError>;

    /// Fetches the user's budget for the given category, if any. The category is matched after trimming.
    async fn fetch_budget_for_category(&self, user_id: i64, category: &str) -> Result<Option<Budget>, BudgetError>;

    /// Deletes the budget with the given id, unlinking any expenses that reference it first. Ownership checks are
    /// the caller's responsibility.
    async fn delete_budget(&self, id: i64) -> Result<(), BudgetError>;
}
