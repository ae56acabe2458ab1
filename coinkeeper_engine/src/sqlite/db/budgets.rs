use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Budget, NewBudget},
    traits::BudgetError,
};

pub async fn insert_budget(budget: NewBudget, conn: &mut SqliteConnection) -> Result<Budget, BudgetError> {
    let result: Result<Budget, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO budgets (user_id, category, limit_cents)
            VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(budget.user_id)
    .bind(&budget.category)
    .bind(budget.limit.value())
    .fetch_one(conn)
    .await;
    match result {
        Ok(budget) => {
            debug!("📝️ Budget [{}] inserted with id {} for user {}", budget.category, budget.id, budget.user_id);
            Ok(budget)
        },
        Err(sqlx::Error::Database(de)) if de.is_unique_violation() => {
            Err(BudgetError::DuplicateCategory(budget.category))
        },
        Err(e) => Err(e.into()),
    }
}

/// All budgets for a user, most recently created first.
pub async fn budgets_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Budget>, sqlx::Error> {
    let budgets = sqlx::query_as("SELECT * FROM budgets WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(budgets)
}

pub async fn budget_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Budget>, sqlx::Error> {
    let budget = sqlx::query_as("SELECT * FROM budgets WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(budget)
}

pub async fn budget_for_category(
    user_id: i64,
    category: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Budget>, sqlx::Error> {
    let budget = sqlx::query_as("SELECT * FROM budgets WHERE user_id = $1 AND category = $2")
        .bind(user_id)
        .bind(category.trim())
        .fetch_optional(conn)
        .await?;
    Ok(budget)
}

pub async fn delete_budget(id: i64, conn: &mut SqliteConnection) -> Result<(), BudgetError> {
    let result = sqlx::query("DELETE FROM budgets WHERE id = $1").bind(id).execute(conn).await?;
    if result.rows_affected() == 0 {
        return Err(BudgetError::BudgetNotFound(id));
    }
    debug!("📝️ Budget {id} deleted");
    Ok(())
}
