use std::fmt::Debug;

use log::debug;

use crate::{
    db_types::{Budget, NewBudget},
    traits::{BudgetError, BudgetManagement},
};

/// The `BudgetApi` provides a unified API for managing per-category monthly budgets.
pub struct BudgetApi<B> {
    db: B,
}

impl<B: Debug> Debug for BudgetApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BudgetApi ({:?})", self.db)
    }
}

impl<B> BudgetApi<B>
where B: BudgetManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Creates a new budget. A user can only have one budget per category.
    pub async fn add_budget(&self, budget: NewBudget) -> Result<Budget, BudgetError> {
        self.db.insert_budget(budget).await
    }

    pub async fn budgets_for_user(&self, user_id: i64) -> Result<Vec<Budget>, BudgetError> {
        self.db.fetch_budgets_for_user(user_id).await
    }

    /// Deletes a budget on behalf of `user_id`. The budget must exist and belong to that user. Expenses that were
    /// linked to the budget are unlinked, not deleted.
    pub async fn delete_budget(&self, user_id: i64, budget_id: i64) -> Result<(), BudgetError> {
        let budget = self.db.fetch_budget_by_id(budget_id).await?.ok_or(BudgetError::BudgetNotFound(budget_id))?;
        if budget.user_id != user_id {
            debug!("💰️ User {user_id} tried to delete budget {budget_id}, which belongs to {}", budget.user_id);
            return Err(BudgetError::NotOwnedByUser(budget_id));
        }
        self.db.delete_budget(budget_id).await
    }
}
