//! Client-side identifier generation.

use uuid::Uuid;

/// Generates a backend-compatible unique identifier.
///
/// The backend accepts up to 36 characters from `[a-zA-Z0-9._-]`; the
/// simple (hyphen-less) form of a v7 UUID fits and sorts by creation time.
pub fn unique_id() -> String {
    Uuid::now_v7().simple().to_string()
}
