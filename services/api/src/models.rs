//! API models for request payloads and stored entities

use serde::Deserialize;
use serde_json::Value;

pub mod invite;
pub mod upload;
pub mod user;

pub use invite::{Invite, NewInvite};
pub use upload::{NewUpload, Upload};
pub use user::{NewUser, User};

/// Request for user login
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Request for user registration
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub code: String,
}

/// Request for upload deletion; `id` may arrive as a number or a string
#[derive(Debug, Default, Deserialize)]
pub struct DeleteUploadRequest {
    pub id: Option<Value>,
}

impl DeleteUploadRequest {
    /// `None` when no usable id was given; `Some(None)` when it cannot name a row
    pub fn upload_id(&self) -> Option<Option<i64>> {
        match &self.id {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(Value::Number(n)) => Some(n.as_i64()),
            Some(Value::String(s)) => Some(s.trim().parse().ok()),
            Some(_) => Some(None),
        }
    }
}

/// Request for invite creation; `uses` may arrive as a number or a string
#[derive(Debug, Default, Deserialize)]
pub struct CreateInviteRequest {
    pub uses: Option<Value>,
}

impl CreateInviteRequest {
    /// Number of uses for the new invite; anything unusable becomes 1
    pub fn uses(&self) -> i32 {
        let parsed = match &self.uses {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match parsed {
            Some(n) if n.is_finite() && n >= 1.0 => n.min(i32::MAX as f64) as i32,
            _ => 1,
        }
    }
}

/// Request for invite deletion
#[derive(Debug, Default, Deserialize)]
pub struct DeleteInviteRequest {
    #[serde(default)]
    pub code: String,
}
