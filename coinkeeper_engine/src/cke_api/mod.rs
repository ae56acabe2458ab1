//! # CoinKeeper engine public API
//!
//! The `cke_api` module exposes the programmatic API for the CoinKeeper engine. The API is modular, so that clients
//! can pick and choose the functionality they need, and each piece only demands the backend capabilities it
//! actually uses.
//!
//! * [`user_api`] handles registration and credential verification.
//! * [`expense_api`] and [`budget_api`] cover the record-keeping operations.
//! * [`analytics_api`] loads expense and budget rows and feeds them through the aggregation functions in
//!   [`analytics`](crate::analytics).
//!
//! # API usage
//!
//! The pattern for using all the APIs is the same. An API instance is created by supplying a database backend that
//! implements the backend traits required by the API.
//!
//! ```rust,ignore
//! use coinkeeper_engine::{ExpenseApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements ExpenseManagement
//! let api = ExpenseApi::new(db);
//! let result = api.expenses_for_user(user_id).await?;
//! ```

pub mod analytics_api;
pub mod budget_api;
pub mod expense_api;
pub mod expense_objects;
pub mod user_api;

pub use expense_objects::{ExpenseListResult, ExpenseQueryFilter};
