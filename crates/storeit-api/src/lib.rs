//! # storeit-api
//!
//! HTTP API layer for StoreIt built on Axum.
//!
//! This is the trusted execution side: it holds the service credential,
//! reads and writes the session cookie, and exposes the session and file
//! action operations as REST endpoints.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
