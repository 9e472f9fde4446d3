//! Upload codes and on-disk file storage

use rand::Rng;
use std::{
    io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::{info, warn};

/// Characters used for upload and invite codes (base36)
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random stem of an upload code
pub const UPLOAD_CODE_LEN: usize = 18;
/// Length of an invite code
pub const INVITE_CODE_LEN: usize = 9;

/// Random base36 string of `len` characters
pub fn random_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// File extension for a MIME type: its subtype without parameters
///
/// `image/png` gives `png`, `image/jpeg; q=1` gives `jpeg`. Types without a
/// subtype fall back to `bin`.
pub fn extension_for(mime_type: &str) -> &str {
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    match essence.split_once('/') {
        Some((_, subtype)) if !subtype.is_empty() => subtype,
        _ => "bin",
    }
}

/// Public locator for a new upload: `<18 random chars>.<ext>`
///
/// Collisions with existing codes are not checked.
pub fn generate_upload_code(mime_type: &str) -> String {
    format!(
        "{}.{}",
        random_code(UPLOAD_CODE_LEN),
        extension_for(mime_type)
    )
}

/// Code for a new invite
pub fn generate_invite_code() -> String {
    random_code(INVITE_CODE_LEN)
}

/// Reduce a client-supplied file name to something safe to join onto a directory
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Directory holding uploaded files
#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        info!("Upload directory ready at {}", self.root.display());
        Ok(())
    }

    /// Write `data` as `<unix millis>-<sanitized name>` and return its path
    pub async fn save(&self, original_name: Option<&str>, data: &[u8]) -> io::Result<PathBuf> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(io::Error::other)?
            .as_millis();
        let name = sanitize_file_name(original_name.unwrap_or_default());
        let path = self.root.join(format!("{millis}-{name}"));

        tokio::fs::write(&path, data).await?;
        Ok(path)
    }

    /// Remove a stored file; a file that is already gone is not an error
    pub async fn remove(&self, path: impl AsRef<Path>) -> io::Result<()> {
        match tokio::fs::remove_file(path.as_ref()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Stored file {} was already missing", path.as_ref().display());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
