//! The backend trait definitions for the CoinKeeper engine.
//!
//! A storage backend acts as a CoinKeeper database by implementing the traits in this module. The capabilities are
//! split by concern so that, for example, the analytics API only needs read access to expenses and budgets, and the
//! endpoint tests can mock exactly the surface a handler touches.

mod budget_management;
mod expense_management;
mod user_management;

pub use budget_management::{BudgetError, BudgetManagement};
pub use expense_management::{ExpenseError, ExpenseManagement};
pub use user_management::{UserAccountError, UserManagement};
