//! Invite model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Invite entity; an invite with `uses == 0` is spent but kept
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: i64,
    pub code: String,
    pub uses: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invite {
    pub fn is_spent(&self) -> bool {
        self.uses <= 0
    }
}

/// New invite creation payload
#[derive(Debug, Clone)]
pub struct NewInvite {
    pub code: String,
    pub uses: i32,
}
