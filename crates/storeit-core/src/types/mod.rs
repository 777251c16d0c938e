//! Shared value types.

pub mod id;
pub mod query;

pub use id::unique_id;
pub use query::Query;
