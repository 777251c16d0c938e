//! # storeit-entity
//!
//! Domain models exchanged with the identity/document/blob backend.
//! Field names follow the backend's JSON shape (`$id`, camelCase) so the
//! same types deserialize from REST responses and from the in-memory
//! backend used in tests.

pub mod account;
pub mod action;
pub mod document;
pub mod file;
pub mod profile;
pub mod session;

pub use account::Account;
pub use action::{ActionDescriptor, ActionKind, MutatingAction, ACTION_DESCRIPTORS};
pub use document::{Document, DocumentList, to_fields};
pub use file::FileRecord;
pub use profile::{NewProfile, ProfileDocument};
pub use session::Session;
