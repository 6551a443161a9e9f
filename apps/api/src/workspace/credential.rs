//! Credential Holder — keeps the user's API key in memory and persists it to a
//! local file on request. The key never appears in logs; use [`mask`].

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::info;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no API key has been set")]
    NotSet,

    #[error("credential file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug)]
pub struct CredentialHolder {
    key: Option<String>,
    path: PathBuf,
}

impl CredentialHolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            key: None,
            path: path.into(),
        }
    }

    /// Stores `key` in memory. A blank key clears the credential.
    pub fn set(&mut self, key: String) {
        let key = key.trim().to_string();
        self.key = (!key.is_empty()).then_some(key);
        match self.masked() {
            Some(masked) => info!("API key set: {masked}"),
            None => info!("API key cleared"),
        }
    }

    pub fn get(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.key.is_some()
    }

    pub fn masked(&self) -> Option<String> {
        self.key.as_deref().map(mask)
    }

    /// Writes the key to the credential file, creating parent directories.
    /// On Unix the file is only readable by its owner.
    pub async fn persist(&self) -> Result<&Path, CredentialError> {
        let key = self.key.as_deref().ok_or(CredentialError::NotSet)?;
        let io_err = |source| CredentialError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).await.map_err(io_err)?;
        file.write_all(key.as_bytes()).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;
        // `mode` only applies on create; tighten a pre-existing file too.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(io_err)?;
        }

        info!("API key {} persisted to {}", mask(key), self.path.display());
        Ok(&self.path)
    }

    /// Loads a previously persisted key into memory.
    /// Returns `Ok(false)` when no credential file exists.
    pub async fn load(&mut self) -> Result<bool, CredentialError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(source) => {
                return Err(CredentialError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let key = contents.trim();
        if key.is_empty() {
            return Ok(false);
        }
        self.key = Some(key.to_string());
        info!("Loaded API key {} from {}", mask(key), self.path.display());
        Ok(true)
    }
}

/// Masks a secret for display: first and last four characters of long keys,
/// nothing at all of short ones.
pub fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
