//! Session lifecycle management including sign-up, sign-in and sign-out.

pub mod manager;

pub use manager::{ActiveSession, SessionManager, SignOutRedirect};
