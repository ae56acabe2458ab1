use std::fmt::Debug;

use log::debug;

use crate::{
    cke_api::{ExpenseListResult, ExpenseQueryFilter},
    db_types::{Expense, NewExpense},
    traits::{ExpenseError, ExpenseManagement},
};

/// The `ExpenseApi` provides a unified API for recording and querying expenses.
pub struct ExpenseApi<B> {
    db: B,
}

impl<B: Debug> Debug for ExpenseApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExpenseApi ({:?})", self.db)
    }
}

impl<B> ExpenseApi<B>
where B: ExpenseManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn add_expense(&self, expense: NewExpense) -> Result<Expense, ExpenseError> {
        self.db.insert_expense(expense).await
    }

    /// Fetches all expenses for the given user, wrapped in an [`ExpenseListResult`] that includes the sum of the
    /// listed amounts. Ordered by spend date, newest first.
    pub async fn expenses_for_user(&self, user_id: i64) -> Result<ExpenseListResult, ExpenseError> {
        let expenses = self.db.fetch_expenses_for_user(user_id).await?;
        let total = expenses.iter().map(|e| e.amount).sum();
        Ok(ExpenseListResult { total, expenses })
    }

    pub async fn search_expenses(&self, filter: ExpenseQueryFilter) -> Result<Vec<Expense>, ExpenseError> {
        self.db.search_expenses(filter).await
    }

    /// Deletes an expense on behalf of `user_id`. The expense must exist and belong to that user.
    pub async fn delete_expense(&self, user_id: i64, expense_id: i64) -> Result<(), ExpenseError> {
        let expense =
            self.db.fetch_expense_by_id(expense_id).await?.ok_or(ExpenseError::ExpenseNotFound(expense_id))?;
        if expense.user_id != user_id {
            debug!("🧾️ User {user_id} tried to delete expense {expense_id}, which belongs to {}", expense.user_id);
            return Err(ExpenseError::NotOwnedByUser(expense_id));
        }
        self.db.delete_expense(expense_id).await
    }
}
