//! Server-rendered pages

use auth::SessionClaims;
use axum::{
    Extension,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::{
    error::{ApiError, ApiResult},
    middleware::session_token,
    state::AppState,
    views,
};

/// Home page with the upload form
pub async fn index(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> ApiResult<Html<String>> {
    let user = state.user_repository.find_by_id(claims.id).await?;
    Ok(Html(views::index_page(user.as_ref(), claims.is_admin)))
}

/// The caller's own uploads
pub async fn uploads(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> ApiResult<Html<String>> {
    let uploads = state.upload_repository.list_by_author(claims.id).await?;
    Ok(Html(views::uploads_page(
        &uploads,
        &state.config.host,
        claims.is_admin,
    )))
}

/// Every user, upload and invite; admins only
pub async fn admin(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> ApiResult<Html<String>> {
    if !claims.is_admin {
        return Err(ApiError::PageForbidden);
    }

    let users = state.user_repository.list().await?;
    let uploads = state.upload_repository.list().await?;
    let invites = state.invite_repository.list().await?;

    Ok(Html(views::admin_page(
        &users,
        &uploads,
        &invites,
        &state.config.host,
    )))
}

/// Login form; signed-in visitors go home
pub async fn login(jar: CookieJar) -> Response {
    if session_token(&jar).is_some() {
        return Redirect::to("/").into_response();
    }
    Html(views::login_page()).into_response()
}

/// Registration form; signed-in visitors go home
pub async fn register(jar: CookieJar) -> Response {
    if session_token(&jar).is_some() {
        return Redirect::to("/").into_response();
    }
    Html(views::register_page()).into_response()
}
