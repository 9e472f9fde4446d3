//! User model

use auth::EncryptedSecret;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// User entity
///
/// `password` holds the hex ciphertext of the user's password and `iv` the
/// hex IV it was encrypted under. Neither is ever serialized.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub iv: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The stored password in the shape the cipher expects
    pub fn secret(&self) -> EncryptedSecret {
        EncryptedSecret {
            iv: self.iv.clone(),
            content: self.password.clone(),
        }
    }
}

/// New user creation payload
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub secret: EncryptedSecret,
    pub is_admin: bool,
}
