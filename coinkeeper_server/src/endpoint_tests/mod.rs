mod analytics;
mod auth;
mod mocks;
