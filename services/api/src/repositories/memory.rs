//! In-memory store implementing every repository trait
//!
//! Selected with `"dialect": "memory"`. Nothing survives a restart; this is
//! meant for local runs and tests.

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{InviteRepository, UploadRepository, UserRepository};
use crate::models::{Invite, NewInvite, NewUpload, NewUser, Upload, User};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    invites: Vec<Invite>,
    uploads: Vec<Upload>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared in-memory tables; clones share the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.username == new_user.username) {
            return Err(DatabaseError::Conflict(format!(
                "username {} already exists",
                new_user.username
            )));
        }

        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            username: new_user.username.clone(),
            password: new_user.secret.content.clone(),
            iv: new_user.secret.iv.clone(),
            is_admin: new_user.is_admin,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self) -> DatabaseResult<Vec<User>> {
        Ok(self.tables.lock().await.users.clone())
    }
}

#[async_trait]
impl InviteRepository for MemoryStore {
    async fn create(&self, new_invite: &NewInvite) -> DatabaseResult<Invite> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let invite = Invite {
            id: tables.next_id(),
            code: new_invite.code.clone(),
            uses: new_invite.uses,
            created_at: now,
            updated_at: now,
        };
        tables.invites.push(invite.clone());
        Ok(invite)
    }

    async fn find_by_code(&self, code: &str) -> DatabaseResult<Option<Invite>> {
        let tables = self.tables.lock().await;
        Ok(tables.invites.iter().find(|i| i.code == code).cloned())
    }

    async fn list(&self) -> DatabaseResult<Vec<Invite>> {
        Ok(self.tables.lock().await.invites.clone())
    }

    async fn consume(&self, id: i64) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.invites.iter_mut().find(|i| i.id == id) {
            Some(invite) if invite.uses > 0 => {
                invite.uses -= 1;
                invite.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn restore(&self, id: i64) -> DatabaseResult<()> {
        let mut tables = self.tables.lock().await;
        if let Some(invite) = tables.invites.iter_mut().find(|i| i.id == id) {
            invite.uses += 1;
            invite.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.invites.len();
        tables.invites.retain(|i| i.id != id);
        Ok(tables.invites.len() < before)
    }

    async fn truncate(&self) -> DatabaseResult<u64> {
        let mut tables = self.tables.lock().await;
        let removed = tables.invites.len() as u64;
        tables.invites.clear();
        Ok(removed)
    }
}

#[async_trait]
impl UploadRepository for MemoryStore {
    async fn create(&self, new_upload: &NewUpload) -> DatabaseResult<Upload> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let upload = Upload {
            id: tables.next_id(),
            code: new_upload.code.clone(),
            path: new_upload.path.clone(),
            author: new_upload.author,
            created_at: now,
            updated_at: now,
        };
        tables.uploads.push(upload.clone());
        Ok(upload)
    }

    async fn find_by_code(&self, code: &str) -> DatabaseResult<Option<Upload>> {
        let tables = self.tables.lock().await;
        Ok(tables.uploads.iter().find(|u| u.code == code).cloned())
    }

    async fn find_owned(&self, id: i64, author: i64) -> DatabaseResult<Option<Upload>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .uploads
            .iter()
            .find(|u| u.id == id && u.author == Some(author))
            .cloned())
    }

    async fn list_by_author(&self, author: i64) -> DatabaseResult<Vec<Upload>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .uploads
            .iter()
            .filter(|u| u.author == Some(author))
            .cloned()
            .collect())
    }

    async fn list(&self) -> DatabaseResult<Vec<Upload>> {
        Ok(self.tables.lock().await.uploads.clone())
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.uploads.len();
        tables.uploads.retain(|u| u.id != id);
        Ok(tables.uploads.len() < before)
    }

    async fn delete_by_author(&self, author: i64) -> DatabaseResult<Vec<Upload>> {
        let mut tables = self.tables.lock().await;
        let (removed, kept): (Vec<Upload>, Vec<Upload>) = std::mem::take(&mut tables.uploads)
            .into_iter()
            .partition(|u| u.author == Some(author));
        tables.uploads = kept;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::EncryptedSecret;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            secret: EncryptedSecret {
                iv: "00".repeat(16),
                content: "abcd".to_string(),
            },
            is_admin: false,
        }
    }

    fn new_upload(code: &str, author: i64) -> NewUpload {
        NewUpload {
            code: code.to_string(),
            path: format!("uploads/{code}"),
            author: Some(author),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_conflict() {
        let store = MemoryStore::new();
        UserRepository::create(&store, &new_user("bob")).await.unwrap();

        let err = UserRepository::create(&store, &new_user("bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
        assert_eq!(UserRepository::list(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invite_consume_stops_at_zero() {
        let store = MemoryStore::new();
        let invite = InviteRepository::create(
            &store,
            &NewInvite {
                code: "INV1".to_string(),
                uses: 1,
            },
        )
        .await
        .unwrap();

        assert!(store.consume(invite.id).await.unwrap());
        assert!(!store.consume(invite.id).await.unwrap());

        let invite = InviteRepository::find_by_code(&store, "INV1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(invite.uses, 0);
        assert!(invite.is_spent());

        store.restore(invite.id).await.unwrap();
        let invite = InviteRepository::find_by_code(&store, "INV1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(invite.uses, 1);
    }

    #[tokio::test]
    async fn test_uploads_scoped_by_author() {
        let store = MemoryStore::new();
        let mine = UploadRepository::create(&store, &new_upload("a.png", 1))
            .await
            .unwrap();
        UploadRepository::create(&store, &new_upload("b.png", 2))
            .await
            .unwrap();
        UploadRepository::create(&store, &new_upload("c.png", 1))
            .await
            .unwrap();

        assert!(store.find_owned(mine.id, 2).await.unwrap().is_none());
        assert!(store.find_owned(mine.id, 1).await.unwrap().is_some());
        assert_eq!(store.list_by_author(1).await.unwrap().len(), 2);

        let removed = store.delete_by_author(1).await.unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(UploadRepository::list(&store).await.unwrap().len(), 1);
    }
}
