//! Login, registration and logout

use auth::SESSION_TTL_SECS;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::Redirect,
};
use axum_extra::extract::{CookieJar, cookie::Cookie};
use common::error::DatabaseError;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    messages,
    middleware::SESSION_COOKIE,
    models::{LoginRequest, NewUser, RegisterRequest},
    routes::payload,
    state::AppState,
};

/// Check credentials and set the session cookie
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<Value>)> {
    let request = payload(body);
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::Rejected(messages::EMPTY_FORM));
    }

    let user = state
        .user_repository
        .find_by_username(&request.username)
        .await?
        .ok_or(ApiError::Rejected(messages::USER_NOT_FOUND))?;

    // A row encrypted under another key decrypts to garbage; that is a mismatch
    let matches = match state.cipher.decrypt(&user.secret()) {
        Ok(stored) => stored == request.password,
        Err(err) => {
            warn!("Stored password of user {} does not decrypt: {}", user.username, err);
            false
        }
    };
    if !matches {
        warn!("Wrong password for user {}", user.username);
        return Err(ApiError::Rejected(messages::WRONG_PASSWORD));
    }

    let token = state.jwt_service.issue(user.id, user.is_admin)?;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .max_age(cookie::time::Duration::seconds(SESSION_TTL_SECS as i64));

    info!("User {} logged in", user.username);

    Ok((
        jar.add(cookie),
        Json(json!({
            "ok": true,
            "message": messages::LOGIN_OK,
        })),
    ))
}

/// Create an account by spending one use of an invite
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let request = payload(body);
    if request.username.is_empty() || request.password.is_empty() || request.code.is_empty() {
        return Err(ApiError::Rejected(messages::EMPTY_FORM));
    }

    let invite = match state.invite_repository.find_by_code(&request.code).await? {
        Some(invite) if !invite.is_spent() => invite,
        _ => return Err(ApiError::Rejected(messages::INVALID_INVITE)),
    };

    if state
        .user_repository
        .find_by_username(&request.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Rejected(messages::USERNAME_TAKEN));
    }

    let secret = state.cipher.encrypt(request.password.as_bytes())?;

    // The use is taken before the insert so two racing sign-ups cannot share it
    if !state.invite_repository.consume(invite.id).await? {
        return Err(ApiError::Rejected(messages::INVALID_INVITE));
    }

    let new_user = NewUser {
        username: request.username,
        secret,
        is_admin: false,
    };

    match state.user_repository.create(&new_user).await {
        Ok(user) => {
            info!("Registered user {} with invite {}", user.username, invite.code);
            Ok(Json(json!({
                "ok": true,
                "message": messages::REGISTER_OK,
            })))
        }
        Err(err) => {
            if let Err(restore_err) = state.invite_repository.restore(invite.id).await {
                error!("Failed to give back invite {}: {}", invite.code, restore_err);
            }
            match err {
                DatabaseError::Conflict(_) => Err(ApiError::Rejected(messages::USERNAME_TAKEN)),
                other => Err(other.into()),
            }
        }
    }
}

/// Drop the session cookie and go home
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/"))
}
