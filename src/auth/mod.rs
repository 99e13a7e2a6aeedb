// src/auth/mod.rs — Session credentials and their persistent storage
//
// Tokens live in a key-value store under the keys `accessToken` and
// `refreshToken`. The store is injected into a `Session`, which the API
// client reads on every request and updates on refresh or expiry.

pub mod callback;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::infra::errors::StorageError;

/// Keys understood by every token store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    AccessToken,
    RefreshToken,
}

impl TokenKey {
    pub const ALL: [TokenKey; 2] = [TokenKey::AccessToken, TokenKey::RefreshToken];

    /// Name used in persistent storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::AccessToken => "accessToken",
            TokenKey::RefreshToken => "refreshToken",
        }
    }
}

/// Key-value persistence surface for session tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    fn get(&self, key: TokenKey) -> Result<Option<String>, StorageError>;
    fn set(&self, key: TokenKey, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: TokenKey) -> Result<(), StorageError>;
}

/// Access/refresh token pair as handed over by the login callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// ─── Session ────────────────────────────────────────────────────────────────

/// Explicit credential handle shared by the client and the callback handler.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Session backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::default()))
    }

    pub fn access_token(&self) -> Result<Option<String>, StorageError> {
        self.store.get(TokenKey::AccessToken)
    }

    pub fn refresh_token(&self) -> Result<Option<String>, StorageError> {
        self.store.get(TokenKey::RefreshToken)
    }

    /// Whether an access token is present. Storage errors count as "no".
    pub fn is_authenticated(&self) -> bool {
        matches!(self.access_token(), Ok(Some(_)))
    }

    pub fn store_credentials(&self, credentials: &Credentials) -> Result<(), StorageError> {
        self.store.set(TokenKey::AccessToken, &credentials.access_token)?;
        self.store.set(TokenKey::RefreshToken, &credentials.refresh_token)
    }

    pub fn set_access_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(TokenKey::AccessToken, token)
    }

    pub fn set_refresh_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(TokenKey::RefreshToken, token)
    }

    /// Remove both tokens. Both removals are attempted; the first error wins.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut first_error = None;
        for key in TokenKey::ALL {
            if let Err(e) = self.store.remove(key) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ─── In-memory store ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<TokenKey, String>>,
}

impl MemoryTokenStore {
    pub fn with_credentials(credentials: &Credentials) -> Self {
        let store = Self::default();
        if let Ok(mut tokens) = store.tokens.lock() {
            tokens.insert(TokenKey::AccessToken, credentials.access_token.clone());
            tokens.insert(TokenKey::RefreshToken, credentials.refresh_token.clone());
        }
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: TokenKey) -> Result<Option<String>, StorageError> {
        let tokens = self.tokens.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(tokens.get(&key).cloned())
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<(), StorageError> {
        let mut tokens = self.tokens.lock().map_err(|_| StorageError::Poisoned)?;
        tokens.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: TokenKey) -> Result<(), StorageError> {
        let mut tokens = self.tokens.lock().map_err(|_| StorageError::Poisoned)?;
        tokens.remove(&key);
        Ok(())
    }
}

// ─── File store ─────────────────────────────────────────────────────────────

/// Tokens persisted as a flat JSON object, e.g. `{"accessToken": "..."}`.
///
/// Tokens are stored as plaintext (chmod 600 on Unix). Every write goes
/// through a temp file and a rename so a crash never leaves half a file.
///
/// File access is synchronous `std::fs`, run inline on the calling task.
/// The file is a few hundred bytes and is touched once per request.
///
/// Reads report a malformed file as `StorageError::Malformed`. Writes and
/// removals replace it instead, so `logout` always gets the user out.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, tokens: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(tokens)?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
        }

        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut tokens = match self.load() {
            Ok(tokens) => tokens,
            Err(StorageError::Malformed(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "token file is malformed, replacing it"
                );
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        f(&mut tokens);
        self.save(&tokens)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: TokenKey) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.load()?.remove(key.as_str()))
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<(), StorageError> {
        self.update(|tokens| {
            tokens.insert(key.as_str().to_string(), value.to_string());
        })
    }

    fn remove(&self, key: TokenKey) -> Result<(), StorageError> {
        self.update(|tokens| {
            tokens.remove(key.as_str());
        })
    }
}
