//! Custom error types for the API service

use auth::{CipherError, TokenError};
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::{messages, views};

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request refused with a message for the user; reported as `{ok: false}`
    #[error("{0}")]
    Rejected(&'static str),

    /// Admin-only API called without the admin claim
    #[error("admin privileges required")]
    AdminRequired,

    /// No session cookie on a protected route
    #[error("login required")]
    LoginRequired,

    /// Session cookie present but the token did not verify
    #[error("session error: {0}")]
    Session(String),

    /// Admin-only page requested without the admin claim
    #[error("page forbidden")]
    PageForbidden,

    /// Unknown page or upload
    #[error("not found: {0}")]
    NotFound(&'static str),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),

    #[error("Password cipher error: {0}")]
    Cipher(#[from] CipherError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Map a token failure: unauthenticated tokens become a session error
    pub fn from_token(err: TokenError) -> Self {
        match err {
            TokenError::Unauthenticated { reason } => ApiError::Session(reason),
            other => ApiError::Token(other),
        }
    }
}

fn rejection(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "ok": false,
        "message": message,
    }));
    (status, body).into_response()
}

fn page(status: StatusCode, message_html: &str) -> Response {
    (status, Html(views::error_page(status.as_u16(), message_html))).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Rejected(message) => rejection(StatusCode::OK, message),
            ApiError::AdminRequired => rejection(StatusCode::FORBIDDEN, messages::ADMIN_REQUIRED),
            ApiError::LoginRequired => Redirect::to("/login").into_response(),
            ApiError::Session(reason) => {
                warn!("Session rejected: {}", reason);
                let message = format!(
                    r#"{}: <b>{}</b><br><a href="/logout">Может поможет выход из аккаунта?</a>"#,
                    messages::SESSION_ERROR,
                    views::escape(&reason)
                );
                page(StatusCode::INTERNAL_SERVER_ERROR, &message)
            }
            ApiError::PageForbidden => page(StatusCode::FORBIDDEN, messages::PAGE_FORBIDDEN),
            ApiError::NotFound(message) => page(StatusCode::NOT_FOUND, message),
            other => {
                error!("Request failed: {}", other);
                page(StatusCode::INTERNAL_SERVER_ERROR, messages::INTERNAL_ERROR)
            }
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
