//! Invite repository for PostgreSQL

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

use super::InviteRepository;
use crate::models::{Invite, NewInvite};

const INVITE_COLUMNS: &str = "id, code, uses, created_at, updated_at";

/// Invite repository
#[derive(Clone)]
pub struct PgInviteRepository {
    pool: PgPool,
}

impl PgInviteRepository {
    /// Create a new invite repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteRepository for PgInviteRepository {
    async fn create(&self, new_invite: &NewInvite) -> DatabaseResult<Invite> {
        info!("Creating invite {} with {} uses", new_invite.code, new_invite.uses);

        let query = format!(
            "INSERT INTO invites (code, uses) VALUES ($1, $2) RETURNING {INVITE_COLUMNS}"
        );

        sqlx::query_as::<_, Invite>(&query)
            .bind(&new_invite.code)
            .bind(new_invite.uses)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn find_by_code(&self, code: &str) -> DatabaseResult<Option<Invite>> {
        let query =
            format!("SELECT {INVITE_COLUMNS} FROM invites WHERE code = $1 ORDER BY id LIMIT 1");

        sqlx::query_as::<_, Invite>(&query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn list(&self) -> DatabaseResult<Vec<Invite>> {
        let query = format!("SELECT {INVITE_COLUMNS} FROM invites ORDER BY id");

        sqlx::query_as::<_, Invite>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn consume(&self, id: i64) -> DatabaseResult<bool> {
        // Single statement so two registrations cannot both take the last use
        let result = sqlx::query(
            r#"
            UPDATE invites
            SET uses = uses - 1, updated_at = NOW()
            WHERE id = $1 AND uses > 0
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() == 1)
    }

    async fn restore(&self, id: i64) -> DatabaseResult<()> {
        sqlx::query("UPDATE invites SET uses = uses + 1, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM invites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn truncate(&self) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM invites")
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected())
    }
}
