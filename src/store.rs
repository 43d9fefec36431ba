//! Local token persistence.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session holds exactly one bearer token. `TokenStore` is that single
//! slot; `FileTokenStore` backs it with one file for the CLI and
//! `MemoryTokenStore` keeps it in-process for embedders and tests.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::AuthError;

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

/// A single-slot token store.
pub trait TokenStore {
    /// Return the stored token, or `None` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the backing store cannot be read.
    fn get(&self) -> Result<Option<String>, AuthError>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the backing store cannot be written.
    fn set(&self, token: &str) -> Result<(), AuthError>;

    /// Forget the stored token. Removing an absent token succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the backing store cannot be cleared.
    fn remove(&self) -> Result<(), AuthError>;
}

// =============================================================================
// MEMORY
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { slot: Mutex::new(Some(token.into())) }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, AuthError> {
        self.slot
            .lock()
            .map_err(|_| AuthError::Storage("token slot poisoned".into()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>, AuthError> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, token: &str) -> Result<(), AuthError> {
        *self.lock()? = Some(token.to_owned());
        Ok(())
    }

    fn remove(&self) -> Result<(), AuthError> {
        *self.lock()? = None;
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>, AuthError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_owned()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, token: &str) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        write_private(&self.path, token)?;
        tracing::debug!(path = %self.path.display(), "token stored");
        Ok(())
    }

    fn remove(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "token removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write `token` so the file is never readable beyond its owner.
///
/// New files are created `0600`; an existing file keeps its inode, so its
/// mode is tightened before the token is written into it.
#[cfg(unix)]
fn write_private(path: &Path, token: &str) -> Result<(), AuthError> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(token.as_bytes())?;
    Ok(())
}

#[cfg(not(unix))]
fn write_private(path: &Path, token: &str) -> Result<(), AuthError> {
    fs::write(path, token)?;
    Ok(())
}
