//! Session extractors: the cookie context, and a resolved session.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use storeit_auth::SessionCookies;
use storeit_service::FileActions;

use crate::error::ApiError;
use crate::state::AppState;

/// The request's session cookie context.
///
/// Never rejects; a request without cookies yields an empty context.
#[derive(Debug, Clone)]
pub struct Cookies(pub SessionCookies);

impl FromRequestParts<AppState> for Cookies {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Cookies(SessionCookies::new(jar, state.cookie_settings.clone())))
    }
}

/// File actions bound to a resolved session.
///
/// Rejects with `NoSession` when the cookie is missing or no longer valid.
#[derive(Debug, Clone)]
pub struct SignedIn(pub FileActions);

impl std::ops::Deref for SignedIn {
    type Target = FileActions;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for SignedIn {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Cookies(cookies) = Cookies::from_request_parts(parts, state).await?;
        let actions = state.file_service.for_session(&cookies).await?;
        Ok(SignedIn(actions))
    }
}
