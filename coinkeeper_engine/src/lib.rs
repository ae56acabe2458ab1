//! CoinKeeper Engine
//!
//! The CoinKeeper engine holds the core logic for the CoinKeeper personal finance tracker: persistence of users,
//! expenses and budgets, and the spending analytics computed over them. It is server-agnostic.
//!
//! The library is divided into three main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You should never need to
//!    access the database directly. Instead, use the public API provided by the engine. The exception is the data
//!    types used in the database, which are defined in the [`db_types`] module and are public.
//! 2. The engine public API ([`mod@cke_api`]). This provides the public-facing functionality of the engine:
//!    registering users, recording expenses, managing budgets, and computing analytics. Backends need to implement
//!    the traits in the [`traits`] module in order to serve the CoinKeeper server.
//! 3. The analytics core ([`analytics`]). Pure aggregation functions — calendar windowing, weekly bucketing,
//!    category totals and budget classification — kept free of I/O so they can be tested exhaustively.

pub mod analytics;
mod cke_api;
pub mod db_types;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::{db_url, new_pool, run_migrations, SqliteDatabase};

pub use cke_api::{
    analytics_api::{AnalyticsApi, AnalyticsError},
    budget_api::BudgetApi,
    expense_api::ExpenseApi,
    expense_objects::{ExpenseListResult, ExpenseQueryFilter},
    user_api::UserApi,
};
