//! Request handlers, one module per domain.

pub mod auth;
pub mod file;
pub mod health;
