//! Application state shared across handlers

use anyhow::{Context, Result};
use auth::{JwtConfig, JwtService, PasswordCipher};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    config::{AppConfig, Dialect},
    models::NewInvite,
    repositories::{InviteRepository, Repositories, UploadRepository, UserRepository},
    storage::UploadStorage,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Present when running against PostgreSQL
    pub db_pool: Option<PgPool>,
    pub jwt_service: JwtService,
    pub cipher: PasswordCipher,
    pub storage: UploadStorage,
    pub user_repository: Arc<dyn UserRepository>,
    pub invite_repository: Arc<dyn InviteRepository>,
    pub upload_repository: Arc<dyn UploadRepository>,
}

impl AppState {
    /// Assemble the state from configuration and already-built repositories
    pub fn new(
        config: AppConfig,
        repositories: Repositories,
        db_pool: Option<PgPool>,
    ) -> Result<Self> {
        let jwt_service = JwtService::new(JwtConfig::new(config.session_secret.clone()))
            .context("Failed to initialize session tokens")?;
        let cipher = PasswordCipher::new(config.database.encrypt_key.as_bytes())
            .context("Failed to initialize password cipher")?;
        let storage = UploadStorage::new(config.upload_dir.clone());

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            jwt_service,
            cipher,
            storage,
            user_repository: repositories.users,
            invite_repository: repositories.invites,
            upload_repository: repositories.uploads,
        })
    }

    /// Connect the configured store, prepare the upload directory and build the state
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        let state = match config.database.dialect {
            Dialect::Postgres => {
                let pool = common::database::init_pool(&config.database.pool_config()).await?;

                if common::database::health_check(&pool).await? {
                    info!("Database connection successful");
                } else {
                    anyhow::bail!("Failed to connect to database");
                }

                common::database::run_migrations(&pool).await?;
                Self::new(config, Repositories::postgres(pool.clone()), Some(pool))?
            }
            Dialect::Memory => {
                warn!("Using the in-memory store; all data is lost on restart");
                Self::new(config, Repositories::memory(), None)?
            }
        };

        state
            .storage
            .ensure_dir()
            .await
            .context("Failed to create upload directory")?;
        state.bootstrap_invites().await?;

        Ok(state)
    }

    /// Create any configured bootstrap invite that does not exist yet
    pub async fn bootstrap_invites(&self) -> Result<()> {
        for code in &self.config.bootstrap_invites {
            if self.invite_repository.find_by_code(code).await?.is_some() {
                continue;
            }

            self.invite_repository
                .create(&NewInvite {
                    code: code.clone(),
                    uses: 1,
                })
                .await?;
            info!("Created bootstrap invite {}", code);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_bootstrap_invites_created_once() {
        let config = AppConfig::from_json(
            r#"{
                "session_secret": "secret",
                "database": {
                    "dialect": "memory",
                    "encrypt_key": "0123456789abcdef0123456789abcdef"
                },
                "bootstrap_invites": ["FIRST"]
            }"#,
        )
        .unwrap();
        let state = AppState::new(config, Repositories::memory(), None).unwrap();

        state.bootstrap_invites().await.unwrap();
        state.bootstrap_invites().await.unwrap();

        let invites = state.invite_repository.list().await.unwrap();
        assert_eq!(invites.len(), 1);
        assert_eq!(invites[0].code, "FIRST");
        assert_eq!(invites[0].uses, 1);
    }
}
