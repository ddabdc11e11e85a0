//! Local session store: the user profile and the analysis history.
//!
//! Two opaque JSON blobs live under fixed keys. `SessionContext` is the
//! single owner of the "current user" for the whole application and gives
//! explicit load / save / clear lifecycle on top of a `KeyValueStore`.
//!
//! Readers that find a malformed blob get `SessionError::Corrupt`; nothing
//! is migrated or repaired automatically.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::i18n::{self, Lang};
use crate::models::{AnalysisRecord, UserProfile};

pub const USER_KEY: &str = "cardiocheck_user";
pub const HISTORY_KEY: &str = "cardiocheck_history";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No user is signed in")]
    NotAuthenticated,
    #[error("Stored entry '{key}' is malformed: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("Session store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Internal lock error")]
    LockPoisoned,
}

// ═══════════════════════════════════════════════════════════
// Storage backends
// ═══════════════════════════════════════════════════════════

/// Minimal string key-value persistence (browser local storage shape).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// One `<key>.json` file per entry inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the default session directory.
    pub fn default_location() -> Self {
        Self::new(crate::config::session_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        std::fs::create_dir_all(&self.dir)?;
        // Write-then-rename so a crash never leaves a half-written blob.
        let target = self.path_for(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));
        {
            let mut file = std::fs::File::create(&staging)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(&staging, &target)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, used by tests and embedders without a disk.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}

fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>, SessionError>
where
    T: serde::de::DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| SessionError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
    }
}

fn write_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), SessionError>
where
    T: serde::Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|e| SessionError::Serialize(e.to_string()))?;
    store.set(key, &raw)
}

// ═══════════════════════════════════════════════════════════
// SessionContext — the one place that knows who is signed in
// ═══════════════════════════════════════════════════════════

/// Application-wide session: current user plus access to the history blob.
pub struct SessionContext<S: KeyValueStore> {
    store: S,
    user: Option<UserProfile>,
}

impl<S: KeyValueStore> SessionContext<S> {
    /// Create an unloaded context. Call `load()` before reading the user.
    pub fn new(store: S) -> Self {
        Self { store, user: None }
    }

    /// Read the stored profile into memory.
    pub fn load(&mut self) -> Result<Option<&UserProfile>, SessionError> {
        self.user = read_json(&self.store, USER_KEY)?;
        Ok(self.user.as_ref())
    }

    /// Persist the in-memory profile (or remove it when signed out).
    pub fn save(&self) -> Result<(), SessionError> {
        match &self.user {
            Some(user) => write_json(&self.store, USER_KEY, user),
            None => self.store.remove(USER_KEY),
        }
    }

    /// Sign out: drop the profile from memory and storage.
    /// History is left in place.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.user = None;
        self.store.remove(USER_KEY)?;
        tracing::info!("Session cleared");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.clear()
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Gate for pages that need a signed-in user.
    pub fn require_user(&self) -> Result<&UserProfile, SessionError> {
        self.user.as_ref().ok_or(SessionError::NotAuthenticated)
    }

    /// Registration overwrites any stored profile.
    pub fn register(&mut self, profile: UserProfile) -> Result<&UserProfile, SessionError> {
        self.user = Some(profile);
        self.save()?;
        tracing::info!("Profile registered");
        Ok(self.require_user()?)
    }

    /// Mock login: keeps a stored profile with the same email, otherwise
    /// stores a bare profile with a placeholder name.
    pub fn login(&mut self, email: &str, lang: Lang) -> Result<&UserProfile, SessionError> {
        let email = email.trim();
        let stored: Option<UserProfile> = read_json(&self.store, USER_KEY)?;
        match stored {
            Some(profile) if profile.email.eq_ignore_ascii_case(email) => {
                self.user = Some(profile);
            }
            _ => {
                self.user = Some(UserProfile {
                    email: email.to_string(),
                    full_name: i18n::t(lang, "auth.defaultName").to_string(),
                    ..Default::default()
                });
                self.save()?;
            }
        }
        Ok(self.require_user()?)
    }

    /// Full analysis history, oldest first.
    pub fn history(&self) -> Result<Vec<AnalysisRecord>, SessionError> {
        Ok(read_json(&self.store, HISTORY_KEY)?.unwrap_or_default())
    }

    /// Append one record and persist. Returns the new history length.
    pub fn append_record(&self, record: AnalysisRecord) -> Result<usize, SessionError> {
        let mut history = self.history()?;
        history.push(record);
        write_json(&self.store, HISTORY_KEY, &history)?;
        Ok(history.len())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
