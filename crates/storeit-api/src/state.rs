//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use storeit_auth::{CookieSettings, DirectorySync, SessionManager};
use storeit_core::config::AppConfig;
use storeit_gateway::{Backend, IdentityGateway};
use storeit_service::FileActionService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Elevated and session client factories
    pub gateway: Arc<IdentityGateway>,
    /// Session lifecycle manager
    pub session_manager: Arc<SessionManager>,
    /// File mutations on behalf of the session
    pub file_service: Arc<FileActionService>,
    /// Session cookie name and attributes
    pub cookie_settings: CookieSettings,
}

impl AppState {
    /// Wires the gateway and services over `backend`.
    pub fn new(config: Arc<AppConfig>, backend: Arc<dyn Backend>) -> Self {
        let gateway = Arc::new(IdentityGateway::new(
            Arc::new(config.backend.clone()),
            backend,
        ));
        let directory = DirectorySync::new(&config.backend, &config.session);
        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&gateway),
            directory,
            config.session.clone(),
        ));
        let file_service = Arc::new(FileActionService::new(
            Arc::clone(&gateway),
            Arc::clone(&session_manager),
        ));

        Self {
            cookie_settings: CookieSettings::from_config(&config),
            config,
            gateway,
            session_manager,
            file_service,
        }
    }
}
