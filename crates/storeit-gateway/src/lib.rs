//! # storeit-gateway
//!
//! The only place backend credentials are turned into clients.
//!
//! - [`backend`]: transport traits for the identity, document and blob APIs
//! - [`client`]: [`AdminClient`] (service credential) and [`SessionClient`]
//!   (end-user session secret) wrappers with account/databases/storage handles
//! - [`gateway`]: [`IdentityGateway`], the two client factories
//! - [`providers`]: the REST provider and the in-memory provider

pub mod backend;
pub mod client;
pub mod gateway;
pub mod providers;

pub use backend::{Backend, BlobBackend, Credential, DocumentBackend, IdentityBackend};
pub use client::{AdminClient, BackendClient, SessionClient};
pub use gateway::{IdentityGateway, SessionSource};
pub use providers::appwrite::AppwriteBackend;
#[cfg(feature = "memory")]
pub use providers::memory::{FailurePoint, MemoryBackend};
