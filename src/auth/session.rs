//! Session token storage
//!
//! The access token is read once at startup, written once after a successful
//! exchange and cleared when it turns out to be unusable. Consumers get it
//! passed in explicitly.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::AuthError;

pub const DEFAULT_SESSION_FILE: &str = ".cache/session_token";

pub trait SessionStore {
    fn get_token(&self) -> Result<Option<String>, AuthError>;
    fn set_token(&self, token: &str) -> Result<(), AuthError>;
    fn clear_token(&self) -> Result<(), AuthError>;
}

/// Token kept in a single file
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn get_token(&self) -> Result<Option<String>, AuthError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_token(&self, token: &str) -> Result<(), AuthError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(&self.path, token)?;
        tracing::debug!(path = %self.path.display(), "Saved session token");
        Ok(())
    }

    fn clear_token(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Cleared session token");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Token held only for the life of the process
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl SessionStore for MemorySessionStore {
    fn get_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.token.lock().map(|t| t.clone()).unwrap_or_default())
    }

    fn set_token(&self, token: &str) -> Result<(), AuthError> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_string());
        }
        Ok(())
    }

    fn clear_token(&self) -> Result<(), AuthError> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/session_token"));

        assert_eq!(store.get_token().unwrap(), None);
        store.set_token("BQD-token").unwrap();
        assert_eq!(store.get_token().unwrap().as_deref(), Some("BQD-token"));

        store.clear_token().unwrap();
        assert_eq!(store.get_token().unwrap(), None);
        // Clearing twice is fine
        store.clear_token().unwrap();
    }

    #[test]
    fn blank_file_means_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session_token");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(FileSessionStore::new(path).get_token().unwrap(), None);
    }

    #[test]
    fn memory_store() {
        let store = MemorySessionStore::default();
        store.set_token("abc").unwrap();
        assert_eq!(store.get_token().unwrap().as_deref(), Some("abc"));
        store.clear_token().unwrap();
        assert!(store.get_token().unwrap().is_none());
    }
}
