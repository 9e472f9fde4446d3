//! Invite administration; every handler sits behind the admin gate

use auth::SessionClaims;
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    messages,
    models::{CreateInviteRequest, DeleteInviteRequest, NewInvite},
    routes::payload,
    state::AppState,
    storage::generate_invite_code,
};

/// Every invite, spent ones included
pub async fn list_invites(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let invites = state.invite_repository.list().await?;

    Ok(Json(json!({
        "ok": true,
        "message": messages::INVITES_LISTED,
        "invites": invites,
    })))
}

/// Create an invite with a fresh code
pub async fn create_invite(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    body: Result<Json<CreateInviteRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let new_invite = NewInvite {
        code: generate_invite_code(),
        uses: payload(body).uses(),
    };
    let invite = state.invite_repository.create(&new_invite).await?;

    info!(
        "Admin {} created invite {} with {} uses",
        claims.id, invite.code, invite.uses
    );

    Ok(Json(json!({
        "ok": true,
        "message": messages::INVITE_CREATED,
        "invite": invite,
    })))
}

/// Delete the invite carrying `code`
pub async fn delete_invite(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    body: Result<Json<DeleteInviteRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let request = payload(body);
    if request.code.is_empty() {
        return Err(ApiError::Rejected(messages::MISSING_INVITE_CODE));
    }

    let invite = state
        .invite_repository
        .find_by_code(&request.code)
        .await?
        .ok_or(ApiError::Rejected(messages::INVALID_INVITE))?;

    if !state.invite_repository.delete(invite.id).await? {
        return Err(ApiError::Rejected(messages::INVALID_INVITE));
    }

    info!("Admin {} deleted invite {}", claims.id, invite.code);

    Ok(Json(json!({
        "ok": true,
        "message": messages::INVITE_DELETED,
    })))
}

/// Delete every invite
pub async fn truncate_invites(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> ApiResult<Json<Value>> {
    let removed = state.invite_repository.truncate().await?;

    info!("Admin {} deleted all {} invites", claims.id, removed);

    Ok(Json(json!({
        "ok": true,
        "message": messages::INVITES_TRUNCATED,
    })))
}
