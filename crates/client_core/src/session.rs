use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use shared::domain::{Session, UserRole};
use thiserror::Error;

pub const USER_KEY: &str = "user";
pub const JWT_KEY: &str = "jwt";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no signed-in user: session entry `user` is missing")]
    MissingUser,
    #[error("session entry `user` is not valid JSON: {0}")]
    InvalidUser(#[source] serde_json::Error),
    #[error("signed-in user has no email")]
    MissingEmail,
    #[error("signed-in user is not an employee ({0:?})")]
    NotEmployee(UserRole),
    #[error("session store at '{path}' is unreadable: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("session store at '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Persisted key-value store holding the signed-in identity, in the shape of
/// browser `localStorage`.
pub trait SessionStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove_item(&self, key: &str) -> Result<(), SessionError>;
}

#[derive(Default)]
pub struct InMemorySessionStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        let items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.remove(key);
        Ok(())
    }
}

/// JSON object on disk; every write rewrites the whole file.
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_items(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(self.io_error(err)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_items(&self, items: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }
        let raw = serde_json::to_string_pretty(items).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, raw).map_err(|err| self.io_error(err))
    }
}

impl SessionStore for FileSessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut items = self.read_items()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut items = self.read_items()?;
        if items.remove(key).is_some() {
            self.write_items(&items)?;
        }
        Ok(())
    }
}

/// Reads and parses the `user` entry.
pub fn load_session(store: &dyn SessionStore) -> Result<Session, SessionError> {
    let raw = store.get_item(USER_KEY)?.ok_or(SessionError::MissingUser)?;
    serde_json::from_str(&raw).map_err(SessionError::InvalidUser)
}

pub fn save_session(store: &dyn SessionStore, session: &Session) -> Result<(), SessionError> {
    let raw = serde_json::to_string(session).map_err(SessionError::InvalidUser)?;
    store.set_item(USER_KEY, &raw)
}

/// Session context handed to the employee controllers. Built once from the
/// store; the controllers never read the store themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeSession {
    pub email: String,
    pub bearer_token: Option<String>,
}

impl EmployeeSession {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            bearer_token: None,
        }
    }

    pub fn from_store(store: &dyn SessionStore) -> Result<Self, SessionError> {
        let session = load_session(store)?;
        if session.role != UserRole::Employee {
            return Err(SessionError::NotEmployee(session.role));
        }
        let email = session
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or(SessionError::MissingEmail)?;
        let bearer_token = store.get_item(JWT_KEY)?;
        Ok(Self {
            email,
            bearer_token,
        })
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
