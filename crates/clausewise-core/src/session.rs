//! Session storage.
//!
//! Persists the logged-in identity in `<base>/session.json` with restricted
//! permissions (0600). Storage is the only source of truth: nothing is cached
//! in memory, so every `get` reflects the last `set`/`clear`.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// The currently authenticated user. No credential material is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Persisted identity storage.
///
/// `get` never fails: unreadable or malformed records read as absent.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<Identity>;

    /// Overwrites the persisted identity.
    ///
    /// # Errors
    /// Returns an error if the record cannot be written.
    fn set(&self, identity: &Identity) -> Result<()>;

    /// Removes the persisted identity. Clearing an empty store is not an error.
    ///
    /// # Errors
    /// Returns an error if an existing record cannot be removed.
    fn clear(&self) -> Result<()>;
}

/// File-backed session store.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under `CLAUSEWISE_HOME`.
    pub fn open_default() -> Self {
        Self::new(paths::session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Identity> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "session record unreadable");
                return None;
            }
        };

        match serde_json::from_str::<Identity>(&contents) {
            Ok(identity) => Some(identity),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring malformed session record");
                None
            }
        }
    }

    fn set(&self, identity: &Identity) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string(identity).context("Failed to serialize session")?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
        // `mode` only applies on create; tighten a file left behind with wider bits.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict {}", self.path.display()))?;
        }
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write to {}", self.path.display()))?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove {}", self.path.display()))
            }
        }
    }
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Identity>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(identity: Identity) -> Self {
        Self {
            inner: Mutex::new(Some(identity)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Identity> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, identity: &Identity) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        Ok(())
    }
}
