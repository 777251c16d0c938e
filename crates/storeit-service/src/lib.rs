//! # storeit-service
//!
//! File actions on top of the session layer:
//!
//! - `file`: the mutation commands, the session-bound [`FileActions`]
//!   that execute them, and the [`FileActionDialog`] state machine
//! - `share`: the reader-list editing buffer with eager removal

pub mod file;
pub mod share;

#[cfg(test)]
pub(crate) mod testing;

pub use file::dialog::{DialogState, FileActionDialog, Selection};
pub use file::mutation::{FileMutator, Mutation, MutationOutcome};
pub use file::service::{FileActionService, FileActions, FileScope, OwnedFile};
pub use share::reconciler::{ShareList, parse_email_input, with_email, without_email};
