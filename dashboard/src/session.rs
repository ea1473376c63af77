//! # Session Store
//!
//! Holds the bearer token of the signed-in user.
//!
//! The store is an explicitly owned object shared as `Arc<SessionStore>`:
//! the HTTP client reads it before every request, the login flow writes it,
//! and the unauthorized policy clears it. Nothing else mutates it, and
//! several independent stores can live in one process.
//!
//! Every write is mirrored to a [`TokenStorage`] so a restart picks the
//! session back up. Storage failures are logged and never fail the
//! in-memory update: for the running process the in-memory token is
//! authoritative.

use parking_lot::RwLock;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fixed storage key for the persisted token.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Durable storage for the session token.
pub trait TokenStorage: Send + Sync {
    /// Load the persisted token, if any.
    fn load(&self) -> io::Result<Option<String>>;

    /// Persist `token`, replacing any previous one.
    fn save(&self, token: &str) -> io::Result<()>;

    /// Remove the persisted token. Removing a missing token is not an error.
    fn remove(&self) -> io::Result<()>;
}

/// Token persisted as a file named [`TOKEN_STORAGE_KEY`] in a directory.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_STORAGE_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, token)
    }

    fn remove(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Volatile storage; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: RwLock<Option<String>>,
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.token.read().clone())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> io::Result<()> {
        *self.token.write() = None;
        Ok(())
    }
}

/// The current session: at most one token per store.
pub struct SessionStore {
    token: RwLock<Option<String>>,
    storage: Box<dyn TokenStorage>,
}

impl SessionStore {
    /// Create a store backed by `storage`, restoring any persisted token.
    pub fn new(storage: impl TokenStorage + 'static) -> Self {
        let token = match storage.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load persisted session, starting signed out");
                None
            }
        };

        if token.is_some() {
            tracing::info!("Restored persisted session");
        }

        Self {
            token: RwLock::new(token),
            storage: Box::new(storage),
        }
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStorage::default())
    }

    /// Current token, if signed in.
    pub fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Replace the current token and persist it.
    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        // held across the write so memory and storage change together
        let mut current = self.token.write();
        if let Err(e) = self.storage.save(&token) {
            tracing::warn!(error = %e, "Failed to persist session token");
        }
        *current = Some(token);
    }

    /// Drop the current token and its persisted copy.
    pub fn clear(&self) {
        let mut current = self.token.write();
        if let Err(e) = self.storage.remove() {
            tracing::warn!(error = %e, "Failed to remove persisted session token");
        }
        *current = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never print the token itself
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
