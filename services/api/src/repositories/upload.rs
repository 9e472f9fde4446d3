//! Upload repository for PostgreSQL

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;

use super::UploadRepository;
use crate::models::{NewUpload, Upload};

const UPLOAD_COLUMNS: &str = "id, code, path, author, created_at, updated_at";

/// Upload repository
#[derive(Clone)]
pub struct PgUploadRepository {
    pool: PgPool,
}

impl PgUploadRepository {
    /// Create a new upload repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UploadRepository for PgUploadRepository {
    async fn create(&self, new_upload: &NewUpload) -> DatabaseResult<Upload> {
        let query = format!(
            r#"
            INSERT INTO uploads (code, path, author)
            VALUES ($1, $2, $3)
            RETURNING {UPLOAD_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Upload>(&query)
            .bind(&new_upload.code)
            .bind(&new_upload.path)
            .bind(new_upload.author)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn find_by_code(&self, code: &str) -> DatabaseResult<Option<Upload>> {
        let query =
            format!("SELECT {UPLOAD_COLUMNS} FROM uploads WHERE code = $1 ORDER BY id LIMIT 1");

        sqlx::query_as::<_, Upload>(&query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn find_owned(&self, id: i64, author: i64) -> DatabaseResult<Option<Upload>> {
        let query = format!("SELECT {UPLOAD_COLUMNS} FROM uploads WHERE id = $1 AND author = $2");

        sqlx::query_as::<_, Upload>(&query)
            .bind(id)
            .bind(author)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn list_by_author(&self, author: i64) -> DatabaseResult<Vec<Upload>> {
        let query = format!("SELECT {UPLOAD_COLUMNS} FROM uploads WHERE author = $1 ORDER BY id");

        sqlx::query_as::<_, Upload>(&query)
            .bind(author)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn list(&self) -> DatabaseResult<Vec<Upload>> {
        let query = format!("SELECT {UPLOAD_COLUMNS} FROM uploads ORDER BY id");

        sqlx::query_as::<_, Upload>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM uploads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_author(&self, author: i64) -> DatabaseResult<Vec<Upload>> {
        let query = format!("DELETE FROM uploads WHERE author = $1 RETURNING {UPLOAD_COLUMNS}");

        sqlx::query_as::<_, Upload>(&query)
            .bind(author)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }
}
