//! Upload model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Upload entity
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub id: i64,
    /// Public locator, `<random>.<ext>`
    pub code: String,
    /// Location of the stored file on disk
    pub path: String,
    /// Uploading user, if still known
    pub author: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New upload creation payload
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub code: String,
    pub path: String,
    pub author: Option<i64>,
}
