//! # CoinKeeper server
//! This module hosts the HTTP surface of CoinKeeper. It is responsible for:
//! Authenticating users and issuing access tokens.
//! Exposing the expense and budget record-keeping endpoints.
//! Exposing the spending analytics endpoints.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/auth/*`: Registration, login and token checking.
//! * `/api/expenses*`, `/api/budgets*`: Record keeping, scoped to the authenticated user.
//! * `/api/analytics/*`: Spending trends, category totals and budget-vs-actual.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
