//! # storeit-auth
//!
//! Credential-based session lifecycle for StoreIt.
//!
//! ## Modules
//!
//! - `cookies`: the explicit session-cookie context threaded through every call
//! - `session`: sign-up, sign-in, sign-out and current-user resolution
//! - `directory`: profile documents mirrored on account creation

pub mod cookies;
pub mod directory;
pub mod session;

pub use cookies::{CookieSettings, SessionCookies};
pub use directory::DirectorySync;
pub use session::{ActiveSession, SessionManager, SignOutRedirect};
