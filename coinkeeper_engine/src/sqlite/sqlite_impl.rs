//! `SqliteDatabase` is a concrete implementation of a CoinKeeper engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`traits`] module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{budgets, db_url, expenses, new_pool, users};
use crate::{
    cke_api::ExpenseQueryFilter,
    db_types::{Budget, Expense, NewBudget, NewExpense, NewUser, User},
    traits::{BudgetError, BudgetManagement, ExpenseError, ExpenseManagement, UserAccountError, UserManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl UserManagement for SqliteDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User, UserAccountError> {
        let mut conn = self.pool.acquire().await.map_err(|e| UserAccountError::DatabaseError(e.to_string()))?;
        users::insert_user(user, &mut conn).await
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, UserAccountError> {
        let mut conn = self.pool.acquire().await.map_err(|e| UserAccountError::DatabaseError(e.to_string()))?;
        let user = users::user_by_email(email, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, UserAccountError> {
        let mut conn = self.pool.acquire().await.map_err(|e| UserAccountError::DatabaseError(e.to_string()))?;
        let user = users::user_by_id(id, &mut conn).await?;
        Ok(user)
    }
}

impl ExpenseManagement for SqliteDatabase {
    /// Inserts the expense and resolves its budget link in a single atomic transaction: if the user has a budget
    /// for the expense's category, the new row references it.
    async fn insert_expense(&self, expense: NewExpense) -> Result<Expense, ExpenseError> {
        let mut tx = self.pool.begin().await?;
        let budget = budgets::budget_for_category(expense.user_id, &expense.category, &mut tx).await?;
        let budget_id = budget.map(|b| b.id);
        let expense = expenses::insert_expense(expense, budget_id, &mut tx).await?;
        tx.commit().await?;
        trace!("🗃️ Expense {} saved. Budget link: {budget_id:?}", expense.id);
        Ok(expense)
    }

    async fn fetch_expenses_for_user(&self, user_id: i64) -> Result<Vec<Expense>, ExpenseError> {
        let mut conn = self.pool.acquire().await?;
        let expenses = expenses::expenses_for_user(user_id, &mut conn).await?;
        Ok(expenses)
    }

    async fn fetch_expense_by_id(&self, id: i64) -> Result<Option<Expense>, ExpenseError> {
        let mut conn = self.pool.acquire().await?;
        let expense = expenses::expense_by_id(id, &mut conn).await?;
        Ok(expense)
    }

    async fn search_expenses(&self, filter: ExpenseQueryFilter) -> Result<Vec<Expense>, ExpenseError> {
        let mut conn = self.pool.acquire().await?;
        let expenses = expenses::search_expenses(filter, &mut conn).await?;
        Ok(expenses)
    }

    async fn delete_expense(&self, id: i64) -> Result<(), ExpenseError> {
        let mut conn = self.pool.acquire().await?;
        expenses::delete_expense(id, &mut conn).await
    }
}

impl BudgetManagement for SqliteDatabase {
    async fn insert_budget(&self, budget: NewBudget) -> Result<Budget, BudgetError> {
        let mut conn = self.pool.acquire().await?;
        budgets::insert_budget(budget, &mut conn).await
    }

    async fn fetch_budgets_for_user(&self, user_id: i64) -> Result<Vec<Budget>, BudgetError> {
        let mut conn = self.pool.acquire().await?;
        let budgets = budgets::budgets_for_user(user_id, &mut conn).await?;
        Ok(budgets)
    }

    async fn fetch_budget_by_id(&self, id: i64) -> Result<Option<Budget>, BudgetError> {
        let mut conn = self.pool.acquire().await?;
        let budget = budgets::budget_by_id(id, &mut conn).await?;
        Ok(budget)
    }

    async fn fetch_budget_for_category(&self, user_id: i64, category: &str) -> Result<Option<Budget>, BudgetError> {
        let mut conn = self.pool.acquire().await?;
        let budget = budgets::budget_for_category(user_id, category, &mut conn).await?;
        Ok(budget)
    }

    /// Unlinks the budget from any expenses referencing it, then deletes it, in one atomic transaction. The
    /// expenses themselves survive.
    async fn delete_budget(&self, id: i64) -> Result<(), BudgetError> {
        let mut tx = self.pool.begin().await?;
        let unlinked = expenses::unlink_budget(id, &mut tx).await?;
        budgets::delete_budget(id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Budget {id} deleted. {unlinked} expenses unlinked.");
        Ok(())
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the environment (or the default).
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
