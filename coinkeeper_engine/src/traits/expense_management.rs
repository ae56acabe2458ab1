use thiserror::Error;

use crate::{
    cke_api::ExpenseQueryFilter,
    db_types::{Expense, NewExpense},
};

#[derive(Debug, Clone, Error)]
pub enum ExpenseError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Expense {0} does not exist")]
    ExpenseNotFound(i64),
    #[error("Expense {0} belongs to another user")]
    NotOwnedByUser(i64),
}

impl From<sqlx::Error> for ExpenseError {
    fn from(e: sqlx::Error) -> Self {
        ExpenseError::DatabaseError(e.to_string())
    }
}

/// The `ExpenseManagement` trait defines behaviour for storing and querying expense records.
#[allow(async_fn_in_trait)]
pub trait ExpenseManagement {
    /// Inserts a new expense. If the user has a budget for the expense's category, the expense is linked to it in
    /// the same transaction.
    async fn insert_expense(&self, expense: NewExpense) -> Result<Expense, ExpenseError>;

    /// Fetches all expenses for the given user, most recent spend date first.
    async fn fetch_expenses_for_user(&self, user_id: i64) -> Result<Vec<Expense>, ExpenseError>;

    async fn fetch_expense_by_id(&self, id: i64) -> Result<Option<Expense>, ExpenseError>;

    /// Fetches expenses matching the filter, in ascending spend-date order. Both date bounds are inclusive.
    async fn search_expenses(&self, filter: ExpenseQueryFilter) -> Result<Vec<Expense>, ExpenseError>;

    /// Deletes the expense with the given id. Ownership checks are the caller's responsibility.
    async fn delete_expense(&self, id: i64) -> Result<(), ExpenseError>;
}
