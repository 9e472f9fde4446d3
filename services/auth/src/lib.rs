//! Credential handling for the image host
//!
//! Two pieces live here: the reversible password cipher and the session
//! token service. Both are constructed once at startup from configuration and
//! shared by the HTTP layer.

pub mod cipher;
pub mod jwt;

pub use cipher::{CipherError, EncryptedSecret, PasswordCipher};
pub use jwt::{JwtConfig, JwtService, SESSION_TTL_SECS, SessionClaims, TokenError};
