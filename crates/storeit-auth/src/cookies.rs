//! The session cookie as an explicit request/response value.
//!
//! Handlers extract the incoming [`CookieJar`], wrap it in
//! [`SessionCookies`], pass it by reference into the session manager, and
//! return the resulting jar so any `Set-Cookie` changes reach the client.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use storeit_core::config::AppConfig;
use storeit_gateway::SessionSource;

/// Name and attributes of the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    /// Cookie name.
    pub name: String,
    /// Whether to set the `Secure` attribute.
    pub secure: bool,
}

impl CookieSettings {
    /// Settings derived from application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            name: config.session.cookie_name.clone(),
            secure: config.secure_cookies(),
        }
    }
}

/// Request-scoped view of the session cookie with pending changes.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    jar: CookieJar,
    settings: CookieSettings,
}

impl SessionCookies {
    /// Wraps the jar extracted from the incoming request.
    pub fn new(jar: CookieJar, settings: CookieSettings) -> Self {
        Self { jar, settings }
    }

    /// A context with no cookies at all.
    pub fn empty(settings: CookieSettings) -> Self {
        Self::new(CookieJar::new(), settings)
    }

    /// The current session secret, if the cookie is present.
    pub fn secret(&self) -> Option<&str> {
        self.jar.get(&self.settings.name).map(|c| c.value())
    }

    /// Persists a session secret as a path-wide, HTTP-only, same-site-strict cookie.
    ///
    /// Overwrites any previous session cookie.
    pub fn store(&mut self, secret: &str) {
        let cookie = Cookie::build((self.settings.name.clone(), secret.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.settings.secure)
            .build();
        self.jar = self.jar.clone().add(cookie);
    }

    /// Deletes the session cookie. A no-op when there is none.
    pub fn clear(&mut self) {
        let removal = Cookie::build((self.settings.name.clone(), "")).path("/");
        self.jar = self.jar.clone().remove(removal);
    }

    /// The session cookie as it currently stands.
    pub fn cookie(&self) -> Option<&Cookie<'static>> {
        self.jar.get(&self.settings.name)
    }

    /// The jar to return with the response.
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl SessionSource for SessionCookies {
    fn session_secret(&self) -> Option<&str> {
        self.secret()
    }
}
