//! Application configuration
//!
//! Configuration comes from a JSON file (path in `IMAGEHOST_CONFIG`, default
//! `config.json`) layered with `IMAGEHOST__*` environment overrides, e.g.
//! `IMAGEHOST__PORT=8080` or `IMAGEHOST__DATABASE__URL=...`.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use auth::cipher::KEY_LEN;
use common::database::DatabaseConfig;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "IMAGEHOST_CONFIG";
/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "IMAGEHOST";

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    Memory,
}

/// Database section
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub dialect: Dialect,
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
    /// AES-256 key for the password cipher, exactly 32 bytes
    pub encrypt_key: String,
}

impl DatabaseSettings {
    /// Pool settings for [`common::database::init_pool`]
    pub fn pool_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            database_url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connection_timeout: self.connection_timeout,
        }
    }
}

/// Upload limits
#[derive(Debug, Clone, Deserialize)]
pub struct UploadLimits {
    /// Maximum size of an uploaded file in bytes
    #[serde(default = "default_file_size")]
    pub file_size: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            file_size: default_file_size(),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Public base URL used in upload links and the ShareX descriptor
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Secret for signing session tokens
    pub session_secret: String,
    pub database: DatabaseSettings,
    #[serde(default = "default_allowed_mimetypes")]
    pub allowed_mimetypes: Vec<String>,
    #[serde(default)]
    pub limits: UploadLimits,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// Invite codes created with a single use at startup when missing
    #[serde(default)]
    pub bootstrap_invites: Vec<String>,
}

fn default_host() -> String {
    "http://localhost:3000".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    DatabaseConfig::default().database_url
}

fn default_max_connections() -> u32 {
    DatabaseConfig::default().max_connections
}

fn default_min_connections() -> u32 {
    DatabaseConfig::default().min_connections
}

fn default_connection_timeout() -> u64 {
    DatabaseConfig::default().connection_timeout
}

fn default_file_size() -> usize {
    10 * 1024 * 1024
}

fn default_allowed_mimetypes() -> Vec<String> {
    ["image/png", "image/jpg", "image/jpeg", "image/gif"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl AppConfig {
    /// Load from the file named by `IMAGEHOST_CONFIG` (default `config.json`)
    pub fn load() -> Result<Self, SettingsError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.json".to_string());
        Self::from_file(path)
    }

    /// Load from a JSON file plus environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let source = File::from(path.as_ref()).format(FileFormat::Json);
        Self::build(Config::builder().add_source(source))
    }

    /// Load from a JSON string plus environment overrides
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Self::build(Config::builder().add_source(File::from_str(json, FileFormat::Json)))
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, SettingsError> {
        let config: AppConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check the values serde cannot
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.session_secret.is_empty() {
            return Err(SettingsError::Invalid(
                "session_secret must not be empty".to_string(),
            ));
        }

        if self.database.encrypt_key.len() != KEY_LEN {
            return Err(SettingsError::Invalid(format!(
                "database.encrypt_key must be {} bytes, got {}",
                KEY_LEN,
                self.database.encrypt_key.len()
            )));
        }

        if self.limits.file_size == 0 {
            return Err(SettingsError::Invalid(
                "limits.file_size must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Public URL of an upload
    pub fn upload_url(&self, code: &str) -> String {
        format!("{}/uploads/{}", self.host.trim_end_matches('/'), code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const MINIMAL: &str = r#"{
        "session_secret": "secret",
        "database": { "encrypt_key": "0123456789abcdef0123456789abcdef" }
    }"#;

    #[test]
    #[serial]
    fn test_defaults() {
        let config = AppConfig::from_json(MINIMAL).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.database.dialect, Dialect::Postgres);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.limits.file_size, 10 * 1024 * 1024);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert!(config.allowed_mimetypes.contains(&"image/gif".to_string()));
        assert!(config.bootstrap_invites.is_empty());
    }

    #[test]
    #[serial]
    fn test_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "host": "https://img.example.com/",
                "port": 8081,
                "session_secret": "s3cret",
                "database": {{
                    "dialect": "memory",
                    "encrypt_key": "0123456789abcdef0123456789abcdef"
                }},
                "allowed_mimetypes": ["image/png"],
                "limits": {{ "file_size": 1024 }},
                "upload_dir": "/tmp/up"
            }}"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.database.dialect, Dialect::Memory);
        assert_eq!(config.allowed_mimetypes, vec!["image/png".to_string()]);
        assert_eq!(config.limits.file_size, 1024);
        assert_eq!(
            config.upload_url("abc.png"),
            "https://img.example.com/uploads/abc.png"
        );
        assert_eq!(config.listen_address(), "0.0.0.0:8081");
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        unsafe {
            std::env::set_var("IMAGEHOST__PORT", "9090");
            std::env::set_var("IMAGEHOST__DATABASE__DIALECT", "memory");
        }

        let result = AppConfig::from_json(MINIMAL);

        unsafe {
            std::env::remove_var("IMAGEHOST__PORT");
            std::env::remove_var("IMAGEHOST__DATABASE__DIALECT");
        }

        let config = result.unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.database.dialect, Dialect::Memory);
    }

    #[test]
    #[serial]
    fn test_rejects_short_key() {
        let json = r#"{
            "session_secret": "secret",
            "database": { "encrypt_key": "too short" }
        }"#;
        assert!(matches!(
            AppConfig::from_json(json),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    #[serial]
    fn test_rejects_missing_secret() {
        let json = r#"{ "database": { "encrypt_key": "0123456789abcdef0123456789abcdef" } }"#;
        assert!(matches!(
            AppConfig::from_json(json),
            Err(SettingsError::Load(_))
        ));
    }
}
