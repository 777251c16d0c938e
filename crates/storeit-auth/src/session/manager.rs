//! Session lifecycle: sign-up, sign-in, sign-out and resolution flows.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use storeit_core::config::SessionConfig;
use storeit_core::error::{AppError, ErrorKind};
use storeit_core::types::unique_id;
use storeit_entity::{Account, ProfileDocument, Session};
use storeit_gateway::{IdentityGateway, SessionClient};

use crate::cookies::SessionCookies;
use crate::directory::DirectorySync;

/// Where the caller is sent after signing out.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SignOutRedirect {
    /// Target path.
    pub location: String,
}

/// A resolved session: the scoped client and the account it acts as.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    /// Client authenticated with the session secret.
    pub client: SessionClient,
    /// The account behind the session.
    pub account: Account,
}

/// Manages the complete session lifecycle.
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// Client factories.
    gateway: Arc<IdentityGateway>,
    /// Profile mirroring.
    directory: DirectorySync,
    /// Session configuration.
    session_config: SessionConfig,
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        gateway: Arc<IdentityGateway>,
        directory: DirectorySync,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            gateway,
            directory,
            session_config,
        }
    }

    /// Performs the complete sign-up flow:
    ///
    /// 1. Create the account with the elevated client
    /// 2. Mirror its profile document
    /// 3. Open a session for it
    /// 4. Persist the session cookie
    ///
    /// A failure after step 1 leaves the account in place; it is not rolled
    /// back. No cookie is written unless every step succeeds.
    pub async fn sign_up(
        &self,
        cookies: &mut SessionCookies,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Account, AppError> {
        let admin = self
            .gateway
            .create_admin_client()
            .map_err(|e| auth_failure("sign up", e))?;

        // Step 1: Create account
        let account = admin
            .account()
            .create(&unique_id(), email, password, full_name)
            .await
            .map_err(|e| auth_failure("sign up", e))?;

        // Step 2: Profile document
        self.directory
            .create_profile(&admin, &account)
            .await
            .map_err(|e| auth_failure("sign up", e))?;

        // Step 3: Session
        let session = admin
            .account()
            .create_email_password_session(email, password)
            .await
            .map_err(|e| auth_failure("sign up", e))?;

        // Step 4: Cookie, only after the backend session exists
        cookies.store(&session.secret);

        info!(account_id = %account.id, session_id = %session.id, "Sign-up successful");
        Ok(account)
    }

    /// Exchanges email and password for a session and persists its cookie.
    ///
    /// On failure the existing cookie, if any, is left untouched.
    pub async fn sign_in(
        &self,
        cookies: &mut SessionCookies,
        email: &str,
        password: &str,
    ) -> Result<Session, AppError> {
        let admin = self
            .gateway
            .create_admin_client()
            .map_err(|e| auth_failure("sign in", e))?;

        let session = admin
            .account()
            .create_email_password_session(email, password)
            .await
            .map_err(|e| auth_failure("sign in", e))?;

        cookies.store(&session.secret);

        info!(account_id = %session.account_id, session_id = %session.id, "Sign-in successful");
        Ok(session)
    }

    /// Deletes the session cookie and revokes the backend session.
    ///
    /// Never fails: revocation errors are logged and dropped, and the
    /// caller is always sent to the sign-in entry point.
    pub async fn sign_out(&self, cookies: &mut SessionCookies) -> SignOutRedirect {
        let client = self.gateway.create_session_client(&*cookies).ok();

        cookies.clear();

        match client {
            Some(client) => match client.account().delete_session("current").await {
                Ok(()) => info!("Session revoked"),
                Err(e) => debug!(error = %e, "Session revocation failed; ignoring"),
            },
            None => debug!("Sign-out without a session cookie"),
        }

        SignOutRedirect {
            location: self.session_config.sign_in_path.clone(),
        }
    }

    /// The account behind the current session, or `None` if there is none.
    ///
    /// Never fails; every resolution error reads as "not signed in".
    pub async fn get_logged_in_user(&self, cookies: &SessionCookies) -> Option<Account> {
        let client = self.gateway.create_session_client(cookies).ok()?;

        match client.account().get().await {
            Ok(account) => Some(account),
            Err(e) => {
                debug!(error = %e, "Session did not resolve to an account");
                None
            }
        }
    }

    /// The current account's profile document, or `None` if either lookup fails.
    pub async fn get_user_info(&self, cookies: &SessionCookies) -> Option<ProfileDocument> {
        let account = self.get_logged_in_user(cookies).await?;

        let admin = match self.gateway.create_admin_client() {
            Ok(admin) => admin,
            Err(e) => {
                error!(error = %e, "Profile lookup needs the elevated client");
                return None;
            }
        };

        match self.directory.find_profile(&admin, &account.id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(account_id = %account.id, error = %e, "Profile lookup failed");
                None
            }
        }
    }

    /// Resolves the session for an operation that cannot proceed without one.
    ///
    /// Unlike [`get_logged_in_user`](Self::get_logged_in_user), a missing or
    /// rejected session is a hard `NoSession` failure.
    pub async fn require_session(&self, cookies: &SessionCookies) -> Result<ActiveSession, AppError> {
        let client = self.gateway.create_session_client(cookies)?;
        let account = client.account().get().await?;
        Ok(ActiveSession { client, account })
    }
}

/// Keeps the user-facing auth errors and folds everything else into `Unknown`.
fn auth_failure(operation: &str, err: AppError) -> AppError {
    match err.kind {
        ErrorKind::InvalidCredentials | ErrorKind::AccountExists => {
            warn!(operation, error = %err, "Authentication rejected");
            err
        }
        _ => {
            error!(operation, error = %err, "Authentication failed");
            AppError {
                kind: ErrorKind::Unknown,
                message: format!("{operation} failed: {}", err.message),
                source: err.source,
            }
        }
    }
}
