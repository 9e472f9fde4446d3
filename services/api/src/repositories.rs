//! Repositories for database operations
//!
//! Each entity has a repository trait so handlers can run against either the
//! PostgreSQL implementations or the in-memory store.

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::PgPool;
use std::sync::Arc;

use crate::models::{Invite, NewInvite, NewUpload, NewUser, Upload, User};

pub mod invite;
pub mod memory;
pub mod upload;
pub mod user;

pub use invite::PgInviteRepository;
pub use memory::MemoryStore;
pub use upload::PgUploadRepository;
pub use user::PgUserRepository;

/// User storage
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; a taken username yields `DatabaseError::Conflict`
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User>;

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>>;

    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>>;

    async fn list(&self) -> DatabaseResult<Vec<User>>;
}

/// Invite storage
#[async_trait]
pub trait InviteRepository: Send + Sync {
    async fn create(&self, new_invite: &NewInvite) -> DatabaseResult<Invite>;

    /// Oldest invite carrying `code`; codes are not unique
    async fn find_by_code(&self, code: &str) -> DatabaseResult<Option<Invite>>;

    async fn list(&self) -> DatabaseResult<Vec<Invite>>;

    /// Take one use from the invite; false when it was already spent
    async fn consume(&self, id: i64) -> DatabaseResult<bool>;

    /// Give back a use taken by [`InviteRepository::consume`]
    async fn restore(&self, id: i64) -> DatabaseResult<()>;

    async fn delete(&self, id: i64) -> DatabaseResult<bool>;

    /// Delete every invite, returning how many were removed
    async fn truncate(&self) -> DatabaseResult<u64>;
}

/// Upload storage
#[async_trait]
pub trait UploadRepository: Send + Sync {
    async fn create(&self, new_upload: &NewUpload) -> DatabaseResult<Upload>;

    /// Oldest upload carrying `code`; collisions are not prevented
    async fn find_by_code(&self, code: &str) -> DatabaseResult<Option<Upload>>;

    /// The upload `id`, but only if `author` owns it
    async fn find_owned(&self, id: i64, author: i64) -> DatabaseResult<Option<Upload>>;

    async fn list_by_author(&self, author: i64) -> DatabaseResult<Vec<Upload>>;

    async fn list(&self) -> DatabaseResult<Vec<Upload>>;

    async fn delete(&self, id: i64) -> DatabaseResult<bool>;

    /// Delete all of `author`'s uploads, returning the removed rows
    async fn delete_by_author(&self, author: i64) -> DatabaseResult<Vec<Upload>>;
}

/// The set of repositories handed to the application state
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub invites: Arc<dyn InviteRepository>,
    pub uploads: Arc<dyn UploadRepository>,
}

impl Repositories {
    /// Repositories backed by PostgreSQL
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            invites: Arc::new(PgInviteRepository::new(pool.clone())),
            uploads: Arc::new(PgUploadRepository::new(pool)),
        }
    }

    /// Repositories sharing one in-memory store
    pub fn memory() -> Self {
        Self::from_store(MemoryStore::new())
    }

    /// Repositories over an existing in-memory store
    pub fn from_store(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            invites: Arc::new(store.clone()),
            uploads: Arc::new(store),
        }
    }
}
