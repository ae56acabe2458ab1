//! Spending analytics.
//!
//! Everything in this module is a pure function over rows that have already been loaded from the backend: grouping
//! expenses into calendar windows, summing per category, and classifying spend against budget limits. The
//! [`AnalyticsApi`](crate::AnalyticsApi) is responsible for fetching the right rows and delegating here.
//!
//! All windowing is done in UTC.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Months, NaiveTime, Utc};
use ck_common::Cents;
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

use crate::db_types::{Budget, Expense};

/// The trailing window used for spending trends: 12 weeks.
pub const TREND_WINDOW_DAYS: i64 = 84;
/// Fraction of a budget's limit at which spending counts as "near the limit".
pub const NEAR_LIMIT_THRESHOLD: f64 = 0.8;

//--------------------------------------    Result objects   ---------------------------------------------------------

/// Total spend for one week of the trend window. `week` is the label of the Sunday starting the week, e.g. `Jan 5`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySpend {
    pub week: String,
    pub total: Cents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Cents,
}

/// Budget limit vs. actual spend for one category over the current month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetComparison {
    pub category: String,
    pub budget: Cents,
    pub actual: Cents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Spending has reached or exceeded the limit.
    OverBudget,
    /// Spending is at 80% or more of the limit, but under it.
    NearLimit,
    OnTrack,
}

/// The classification of one budget for the current month.
///
/// Serializes with the status both as a tag and as the three boolean flags the original alert consumers read.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetAlert {
    pub category: String,
    pub limit: Cents,
    pub spent: Cents,
    pub remaining: Cents,
    /// Percentage of the limit used, rounded to the nearest whole percent. Zero when the limit is zero.
    pub percent_used: u32,
    pub status: BudgetStatus,
}

impl Serialize for BudgetAlert {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("BudgetAlert", 9)?;
        row.serialize_field("category", &self.category)?;
        row.serialize_field("limit", &self.limit)?;
        row.serialize_field("spent", &self.spent)?;
        row.serialize_field("remaining", &self.remaining)?;
        row.serialize_field("percent_used", &self.percent_used)?;
        row.serialize_field("status", &self.status)?;
        row.serialize_field("is_over_budget", &(self.status == BudgetStatus::OverBudget))?;
        row.serialize_field("is_near_limit", &(self.status == BudgetStatus::NearLimit))?;
        row.serialize_field("is_on_track", &(self.status == BudgetStatus::OnTrack))?;
        row.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAlerts {
    pub has_budgets: bool,
    pub categories: Vec<BudgetAlert>,
}

//--------------------------------------      Windowing      ---------------------------------------------------------

/// The inclusive `[start, end]` bounds of the calendar month containing `now`:
/// the first of the month at 00:00:00 through the last day at 23:59:59.
pub fn month_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let first = now.date_naive() - Duration::days(i64::from(now.date_naive().day0()));
    let start = first.and_time(NaiveTime::MIN);
    let end = (first + Months::new(1)).and_time(NaiveTime::MIN) - Duration::seconds(1);
    (start.and_utc(), end.and_utc())
}

/// The start of the trailing trend window: 12 weeks before `now`.
pub fn trend_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(TREND_WINDOW_DAYS)
}

/// The Sunday starting the week that contains `date`.
pub fn week_start(date: chrono::NaiveDate) -> chrono::NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

//--------------------------------------     Aggregation     ---------------------------------------------------------

/// Buckets expenses into weeks (starting Sunday) and sums each bucket, in ascending week order.
///
/// Only non-empty buckets appear in the result. The caller is expected to have windowed the expenses already; this
/// function buckets whatever it is given.
pub fn weekly_trends(expenses: &[Expense]) -> Vec<WeeklySpend> {
    let mut buckets = BTreeMap::new();
    for expense in expenses {
        let week = week_start(expense.spent_on.date_naive());
        *buckets.entry(week).or_insert(Cents::ZERO) += expense.amount;
    }
    buckets
        .into_iter()
        .map(|(week, total)| WeeklySpend { week: week.format("%b %-d").to_string(), total })
        .collect()
}

/// Sums expense amounts per category, preserving the order in which categories first appear in the input.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|t| t.category == expense.category) {
            Some(entry) => entry.amount += expense.amount,
            None => totals.push(CategoryTotal { category: expense.category.clone(), amount: expense.amount }),
        }
    }
    totals
}

/// Pairs each budget's limit with the actual spend in its category. Categories without any spend report zero.
pub fn budget_comparison(budgets: &[Budget], expenses: &[Expense]) -> Vec<BudgetComparison> {
    let spent = category_totals(expenses);
    budgets
        .iter()
        .map(|budget| BudgetComparison {
            category: budget.category.clone(),
            budget: budget.limit,
            actual: spent_in(&spent, &budget.category),
        })
        .collect()
}

/// Classifies every budget against the given (current-month) expenses.
pub fn classify_budgets(budgets: &[Budget], expenses: &[Expense]) -> BudgetAlerts {
    if budgets.is_empty() {
        return BudgetAlerts { has_budgets: false, categories: vec![] };
    }
    let spent = category_totals(expenses);
    let categories = budgets
        .iter()
        .map(|budget| classify(budget.category.clone(), budget.limit, spent_in(&spent, &budget.category)))
        .collect();
    BudgetAlerts { has_budgets: true, categories }
}

/// Classifies a single category's spend against its limit.
///
/// Spending exactly the limit counts as over budget; a zero limit with zero spend does not.
pub fn classify(category: String, limit: Cents, spent: Cents) -> BudgetAlert {
    let percent = if limit.is_zero() { 0.0 } else { spent.value() as f64 / limit.value() as f64 * 100.0 };
    let over = spent > limit || (spent == limit && !limit.is_zero());
    let status = if over {
        BudgetStatus::OverBudget
    } else if percent >= NEAR_LIMIT_THRESHOLD * 100.0 {
        BudgetStatus::NearLimit
    } else {
        BudgetStatus::OnTrack
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent_used = percent.round() as u32;
    BudgetAlert { category, limit, spent, remaining: limit - spent, percent_used, status }
}

fn spent_in(totals: &[CategoryTotal], category: &str) -> Cents {
    totals.iter().find(|t| t.category == category).map(|t| t.amount).unwrap_or(Cents::ZERO)
}
