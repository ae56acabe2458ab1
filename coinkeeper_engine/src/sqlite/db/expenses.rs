use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    cke_api::ExpenseQueryFilter,
    db_types::{Expense, NewExpense},
    traits::ExpenseError,
};

/// Inserts a new expense using the given connection. This is not atomic on its own; embed the call inside a
/// transaction (passing `&mut *tx`) when it must be, e.g. when the budget link is resolved in the same unit of work.
pub async fn insert_expense(
    expense: NewExpense,
    budget_id: Option<i64>,
    conn: &mut SqliteConnection,
) -> Result<Expense, ExpenseError> {
    let expense: Expense = sqlx::query_as(
        r#"
            INSERT INTO expenses (
                user_id,
                title,
                category,
                amount_cents,
                spent_on,
                budget_id
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(expense.user_id)
    .bind(expense.title)
    .bind(expense.category)
    .bind(expense.amount.value())
    .bind(expense.spent_on)
    .bind(budget_id)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Expense [{}] inserted with id {} for user {}", expense.title, expense.id, expense.user_id);
    Ok(expense)
}

/// All expenses for a user, most recent spend date first.
pub async fn expenses_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Expense>, sqlx::Error> {
    let expenses = sqlx::query_as("SELECT * FROM expenses WHERE user_id = $1 ORDER BY spent_on DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(expenses)
}

pub async fn expense_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Expense>, sqlx::Error> {
    let expense = sqlx::query_as("SELECT * FROM expenses WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(expense)
}

/// Fetches expenses according to criteria specified in the `ExpenseQueryFilter`.
///
/// Resulting expenses are ordered by `spent_on` in ascending order. Both date bounds are inclusive.
pub async fn search_expenses(
    filter: ExpenseQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<Expense>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT * FROM expenses
    "#,
    );
    if !filter.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(user_id) = filter.user_id {
        where_clause.push("user_id = ");
        where_clause.push_bind_unseparated(user_id);
    }
    if let Some(category) = filter.category {
        where_clause.push("category = ");
        where_clause.push_bind_unseparated(category);
    }
    if let Some(since) = filter.since {
        where_clause.push("spent_on >= ");
        where_clause.push_bind_unseparated(since);
    }
    if let Some(until) = filter.until {
        where_clause.push("spent_on <= ");
        where_clause.push_bind_unseparated(until);
    }
    builder.push(" ORDER BY spent_on ASC");

    trace!("📝️ Executing query: {}", builder.sql());
    let query = builder.build_query_as::<Expense>();
    let expenses = query.fetch_all(conn).await?;
    trace!("📝️ Result of search_expenses: {:?}", expenses.len());
    Ok(expenses)
}

pub async fn delete_expense(id: i64, conn: &mut SqliteConnection) -> Result<(), ExpenseError> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = $1").bind(id).execute(conn).await?;
    if result.rows_affected() == 0 {
        return Err(ExpenseError::ExpenseNotFound(id));
    }
    debug!("📝️ Expense {id} deleted");
    Ok(())
}

/// Clears the budget link on every expense referencing the given budget. Returns the number of expenses touched.
pub async fn unlink_budget(budget_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE expenses SET budget_id = NULL, updated_at = CURRENT_TIMESTAMP WHERE budget_id = $1")
            .bind(budget_id)
            .execute(conn)
            .await?;
    Ok(result.rows_affected())
}
