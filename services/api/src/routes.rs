//! HTTP routes

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::debug;

use crate::{
    error::ApiError,
    messages,
    middleware::{admin_middleware, session_middleware},
    state::AppState,
};

pub mod invites;
pub mod pages;
pub mod session;
pub mod uploads;

/// Room for multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the router for the image host
pub fn create_router(state: AppState) -> Router {
    let body_limit = upload_body_limit(state.config.limits.file_size);

    let admin_routes = Router::new()
        .route("/api/invite/list", post(invites::list_invites))
        .route("/api/invite/create", post(invites::create_invite))
        .route("/api/invite/delete", post(invites::delete_invite))
        .route("/api/invite/truncate", post(invites::truncate_invites))
        .route_layer(middleware::from_fn(admin_middleware));

    let protected_routes = Router::new()
        .route("/", get(pages::index))
        .route("/uploads", get(pages::uploads))
        .route("/admin", get(pages::admin))
        .route("/api/uploads/list", post(uploads::list_uploads))
        .route("/api/uploads/delete", post(uploads::delete_upload))
        .route("/api/uploads/truncate", post(uploads::truncate_uploads))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    // GET serves the ShareX descriptor to anyone; POST needs a session
    let upload_create = get(uploads::sharex_config).merge(
        post(uploads::create_upload)
            .layer(DefaultBodyLimit::max(body_limit))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                session_middleware,
            )),
    );

    Router::new()
        .route("/health", get(health_check))
        .route("/login", get(pages::login))
        .route("/register", get(pages::register))
        .route("/logout", get(session::logout))
        .route("/uploads/:code", get(uploads::serve_upload))
        .route("/api/login", post(session::login))
        .route("/api/register", post(session::register))
        .route("/api/uploads/create", upload_create)
        .merge(protected_routes)
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Request body limit for uploads of at most `file_size` bytes
fn upload_body_limit(file_size: usize) -> usize {
    file_size.saturating_add(MULTIPART_OVERHEAD)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match &state.db_pool {
        Some(pool) => match common::database::health_check(pool).await {
            Ok(true) => "up",
            _ => "down",
        },
        None => "memory",
    };

    Json(json!({
        "status": "ok",
        "service": "imagehost",
        "database": database,
    }))
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound(messages::PAGE_NOT_FOUND)
}

/// Body of a JSON request, or the empty payload when it is missing or malformed
pub(crate) fn payload<T: Default>(body: Result<Json<T>, JsonRejection>) -> T {
    match body {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            debug!("Treating unreadable JSON body as empty: {}", rejection);
            T::default()
        }
    }
}
