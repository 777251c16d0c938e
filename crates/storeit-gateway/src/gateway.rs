//! The two client factories every other component goes through.

use std::sync::Arc;

use tracing::debug;

use storeit_core::config::BackendConfig;
use storeit_core::error::AppError;

use crate::backend::{Backend, Credential};
use crate::client::{AdminClient, BackendClient, SessionClient};

/// Anything that can hand over the current session secret.
///
/// Implemented by the session cookie context so the gateway never reads
/// cookies from ambient state.
pub trait SessionSource {
    /// The raw session secret, if one is present.
    fn session_secret(&self) -> Option<&str>;
}

impl SessionSource for Option<String> {
    fn session_secret(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl SessionSource for str {
    fn session_secret(&self) -> Option<&str> {
        Some(self)
    }
}

/// Builds elevated and session-scoped clients for one backend.
#[derive(Debug, Clone)]
pub struct IdentityGateway {
    config: Arc<BackendConfig>,
    backend: Arc<dyn Backend>,
}

impl IdentityGateway {
    /// Creates a gateway over an already-constructed backend.
    pub fn new(config: Arc<BackendConfig>, backend: Arc<dyn Backend>) -> Self {
        Self { config, backend }
    }

    /// Backend identifiers this gateway was built with.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Client holding the service credential.
    ///
    /// Fails with a configuration error when no API key is configured.
    pub fn create_admin_client(&self) -> Result<AdminClient, AppError> {
        if self.config.api_key.trim().is_empty() {
            return Err(AppError::configuration(
                "backend.api_key is required for the elevated client",
            ));
        }
        Ok(AdminClient(BackendClient::new(
            Arc::clone(&self.backend),
            Credential::ApiKey(self.config.api_key.clone()),
        )))
    }

    /// Client scoped to the session secret carried by `source`.
    ///
    /// Fails with `NoSession` when there is no secret. Whether the backend
    /// still honours the secret is only known on the first call.
    pub fn create_session_client<S>(&self, source: &S) -> Result<SessionClient, AppError>
    where
        S: SessionSource + ?Sized,
    {
        let secret = source
            .session_secret()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::no_session("No session"))?;

        debug!("Creating session client");
        Ok(SessionClient(BackendClient::new(
            Arc::clone(&self.backend),
            Credential::Session(secret.to_string()),
        )))
    }

    /// Direct download reference for a blob.
    pub fn download_url(&self, blob_id: &str) -> String {
        self.config.download_url(blob_id)
    }
}
