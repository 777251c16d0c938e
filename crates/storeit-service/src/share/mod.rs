//! Reader-list editing.

pub mod reconciler;
