//! HTTP-level tests against the in-memory backend.

mod auth_test;
mod file_test;
mod helpers;
