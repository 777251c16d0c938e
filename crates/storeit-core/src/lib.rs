//! # storeit-core
//!
//! Core crate for StoreIt. Contains the configuration schema, the unified
//! error system, and the small value types (document queries, generated
//! identifiers) shared by the gateway, auth and service crates.
//!
//! This crate has **no** internal dependencies on other StoreIt crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
