//! Per-file actions: rename, share, delete, download and details.

pub mod dialog;
pub mod mutation;
pub mod service;
