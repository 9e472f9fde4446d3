//! Reversible password cipher
//!
//! Passwords are stored encrypted with AES-256 in CTR mode under a fixed,
//! process-wide key and a fresh random 16-byte IV per value. This keeps them
//! recoverable, which is weaker than a one-way hash: anyone holding the key
//! can read every password. The ciphertext carries no authentication tag and
//! is therefore malleable.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Key length for AES-256
pub const KEY_LEN: usize = 32;
/// IV length (one AES block)
pub const IV_LEN: usize = 16;

/// Errors raised by [`PasswordCipher`]
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption key must be {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("initialization vector must be {IV_LEN} bytes, got {0}")]
    InvalidIvLength(usize),

    #[error("invalid hex encoding: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("decrypted value is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Hex-encoded ciphertext together with the IV it was produced under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret {
    pub iv: String,
    pub content: String,
}

/// AES-256-CTR helper bound to one key
#[derive(Clone)]
pub struct PasswordCipher {
    key: [u8; KEY_LEN],
}

impl std::fmt::Debug for PasswordCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCipher").finish_non_exhaustive()
    }
}

impl PasswordCipher {
    /// Build a cipher from raw key bytes; the key must be exactly 32 bytes
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        let key: [u8; KEY_LEN] = key
            .try_into()
            .map_err(|_| CipherError::InvalidKeyLength(key.len()))?;
        Ok(Self { key })
    }

    /// Encrypt `plaintext` under a freshly generated IV
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedSecret, CipherError> {
        let mut iv = [0u8; IV_LEN];
        rand::thread_rng().fill_bytes(&mut iv);

        let mut buffer = plaintext.to_vec();
        self.apply(&iv, &mut buffer)?;

        Ok(EncryptedSecret {
            iv: hex::encode(iv),
            content: hex::encode(buffer),
        })
    }

    /// Decrypt a secret produced by [`PasswordCipher::encrypt`]
    ///
    /// A wrong key or IV does not fail here; it produces different bytes,
    /// which usually surface as [`CipherError::Utf8`] or a mismatch upstream.
    pub fn decrypt(&self, secret: &EncryptedSecret) -> Result<String, CipherError> {
        let iv = hex::decode(&secret.iv)?;
        let mut buffer = hex::decode(&secret.content)?;
        self.apply(&iv, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    fn apply(&self, iv: &[u8], buffer: &mut [u8]) -> Result<(), CipherError> {
        if iv.len() != IV_LEN {
            return Err(CipherError::InvalidIvLength(iv.len()));
        }
        let mut cipher = Aes256Ctr::new_from_slices(&self.key, iv)
            .map_err(|_| CipherError::InvalidIvLength(iv.len()))?;
        cipher.apply_keystream(buffer);
        Ok(())
    }
}
