//! Auth handlers: sign-up, sign-in, sign-out, me, profile.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum_extra::extract::cookie::CookieJar;

use crate::dto::request::{SignInRequest, SignUpRequest, validate};
use crate::dto::response::{AccountResponse, ApiResponse, ProfileResponse, SessionResponse};
use crate::error::ApiError;
use crate::extractors::Cookies;
use crate::state::AppState;

/// POST /api/auth/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    Cookies(mut cookies): Cookies,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, CookieJar, Json<ApiResponse<AccountResponse>>), ApiError> {
    validate(&req)?;

    let account = state
        .session_manager
        .sign_up(&mut cookies, &req.email, &req.password, &req.full_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        cookies.into_jar(),
        Json(ApiResponse::ok(account.into())),
    ))
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Cookies(mut cookies): Cookies,
    Json(req): Json<SignInRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SessionResponse>>), ApiError> {
    validate(&req)?;

    let session = state
        .session_manager
        .sign_in(&mut cookies, &req.email, &req.password)
        .await?;

    Ok((cookies.into_jar(), Json(ApiResponse::ok(session.into()))))
}

/// POST /api/auth/sign-out
///
/// Always redirects to the sign-in page, whether or not revocation worked.
pub async fn sign_out(
    State(state): State<AppState>,
    Cookies(mut cookies): Cookies,
) -> (CookieJar, Redirect) {
    let redirect = state.session_manager.sign_out(&mut cookies).await;
    (cookies.into_jar(), Redirect::to(&redirect.location))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Cookies(cookies): Cookies,
) -> Json<ApiResponse<Option<AccountResponse>>> {
    let account = state.session_manager.get_logged_in_user(&cookies).await;
    Json(ApiResponse::ok(account.map(Into::into)))
}

/// GET /api/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    Cookies(cookies): Cookies,
) -> Json<ApiResponse<Option<ProfileResponse>>> {
    let profile = state.session_manager.get_user_info(&cookies).await;
    Json(ApiResponse::ok(profile.map(Into::into)))
}
