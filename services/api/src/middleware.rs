//! Session middleware for cookie-carried JWT validation

use auth::SessionClaims;
use axum::{
    Extension,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Cookie holding the signed session token
pub const SESSION_COOKIE: &str = "session_hash";

/// Session token from the cookie jar, ignoring empty values
pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
}

/// Session middleware
///
/// Redirects to `/login` without a cookie, fails with a session error when the
/// token does not verify, and otherwise attaches the [`SessionClaims`] to the
/// request extensions.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(&jar).ok_or(ApiError::LoginRequired)?;

    let claims = state
        .jwt_service
        .verify(token)
        .map_err(ApiError::from_token)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Admin gate; must run inside [`session_middleware`]
pub async fn admin_middleware(
    Extension(claims): Extension<SessionClaims>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !claims.is_admin {
        warn!(
            "User {} attempted admin action {}",
            claims.id,
            req.uri().path()
        );
        return Err(ApiError::AdminRequired);
    }

    Ok(next.run(req).await)
}
