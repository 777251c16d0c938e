//! Backend implementations.

pub mod appwrite;
#[cfg(feature = "memory")]
pub mod memory;
