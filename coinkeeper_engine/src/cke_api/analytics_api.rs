//! Loads the rows the aggregation functions need and hands them over.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::trace;
use thiserror::Error;

use crate::{
    analytics,
    analytics::{BudgetAlerts, BudgetComparison, CategoryTotal, WeeklySpend},
    cke_api::ExpenseQueryFilter,
    db_types::Expense,
    traits::{BudgetError, BudgetManagement, ExpenseError, ExpenseManagement},
};

#[derive(Debug, Clone, Error)]
pub enum AnalyticsError {
    #[error("Expense query failed: {0}")]
    Expense(#[from] ExpenseError),
    #[error("Budget query failed: {0}")]
    Budget(#[from] BudgetError),
}

/// The `AnalyticsApi` produces the spending aggregates: weekly trends, per-category totals, budget-vs-actual and
/// the over/near/under-budget classification.
///
/// Every method takes `now` explicitly so that callers (and tests) control the reference point of the windows.
pub struct AnalyticsApi<B> {
    db: B,
}

impl<B: Debug> Debug for AnalyticsApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AnalyticsApi ({:?})", self.db)
    }
}

impl<B> AnalyticsApi<B>
where B: ExpenseManagement + BudgetManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Weekly spending totals over the trailing 12 weeks.
    pub async fn spending_trends(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<WeeklySpend>, AnalyticsError> {
        let filter =
            ExpenseQueryFilter::default().for_user(user_id).since(analytics::trend_window_start(now)).until(now);
        let expenses = self.db.search_expenses(filter).await?;
        trace!("📊️ Trend query returned {} expenses for user {user_id}", expenses.len());
        Ok(analytics::weekly_trends(&expenses))
    }

    /// Per-category spending totals for the current calendar month.
    pub async fn category_totals(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<CategoryTotal>, AnalyticsError> {
        let expenses = self.current_month_expenses(user_id, now).await?;
        Ok(analytics::category_totals(&expenses))
    }

    /// Budget limit vs. actual spend per budgeted category, for the current calendar month.
    pub async fn budget_comparison(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<BudgetComparison>, AnalyticsError> {
        let budgets = self.db.fetch_budgets_for_user(user_id).await?;
        let expenses = self.current_month_expenses(user_id, now).await?;
        Ok(analytics::budget_comparison(&budgets, &expenses))
    }

    /// Classifies each of the user's budgets as over budget, near the limit, or on track for the current month.
    pub async fn budget_alerts(&self, user_id: i64, now: DateTime<Utc>) -> Result<BudgetAlerts, AnalyticsError> {
        let budgets = self.db.fetch_budgets_for_user(user_id).await?;
        if budgets.is_empty() {
            return Ok(BudgetAlerts { has_budgets: false, categories: vec![] });
        }
        let expenses = self.current_month_expenses(user_id, now).await?;
        Ok(analytics::classify_budgets(&budgets, &expenses))
    }

    async fn current_month_expenses(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<Expense>, AnalyticsError> {
        let (start, end) = analytics::month_window(now);
        let filter = ExpenseQueryFilter::default().for_user(user_id).since(start).until(end);
        let expenses = self.db.search_expenses(filter).await?;
        trace!("📊️ Month window [{start}, {end}] returned {} expenses for user {user_id}", expenses.len());
        Ok(expenses)
    }
}
