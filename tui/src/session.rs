//! Persistent session identity store.
//!
//! The backend has no session tokens; the client just remembers who logged
//! in. This is the explicit load/save/clear lifecycle around the few identity
//! fields kept across launches (seller id, name, email), stored as JSON under
//! `~/.dermascan/session.json`. Logging out or deleting the account clears
//! the file.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

const SESSION_FILENAME: &str = "session.json";

/// Identity of the signed-in seller, passed to the screens that need it
/// rather than looked up ambiently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub seller_id: i64,
    pub name: String,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

impl SessionIdentity {
    pub fn new(seller_id: i64, name: String, email: String) -> Self {
        Self {
            seller_id,
            name,
            email,
            signed_in_at: Utc::now(),
        }
    }
}

/// File-backed session store. When `path` is `None` (tests), persistence is
/// disabled and load always answers `None`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Store backed by the default session path (if resolvable).
    pub fn new() -> Self {
        Self::new_with_path(resolve_session_path())
    }

    pub fn new_with_path(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Read the persisted identity, tolerating a missing or corrupt file.
    pub fn load(&self) -> Option<SessionIdentity> {
        let path = self.path.as_deref()?;
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!("failed to read session from {}: {err}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(identity) => Some(identity),
            Err(err) => {
                tracing::warn!("discarding unparsable session file: {err}");
                None
            }
        }
    }

    /// Persist the identity, best-effort. A failed write only costs the user
    /// a re-login next launch.
    pub fn save(&self, identity: &SessionIdentity) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        if let Err(err) = persist_session(path, identity) {
            tracing::warn!("failed to persist session to {}: {err}", path.display());
        }
    }

    /// Remove the persisted identity (logout, account deletion).
    pub fn clear(&self) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!("failed to clear session at {}: {err}", path.display()),
        }
    }
}

fn resolve_session_path() -> Option<PathBuf> {
    #[cfg(test)]
    {
        None
    }

    #[cfg(not(test))]
    {
        let home = dirs::home_dir()?;
        Some(home.join(".dermascan").join(SESSION_FILENAME))
    }
}

fn persist_session(path: &Path, identity: &SessionIdentity) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::other("session path has no parent directory"))?;
    std::fs::create_dir_all(parent)?;
    let json = serde_json::to_string(identity).map_err(|err| io::Error::other(err.to_string()))?;
    std::fs::write(path, format!("{json}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn save_load_clear_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(SESSION_FILENAME);
        let store = SessionStore::new_with_path(Some(path));

        assert_eq!(store.load(), None);

        let identity = SessionIdentity::new(12, "Mira".to_string(), "mira@example.com".to_string());
        store.save(&identity);
        assert_eq!(store.load(), Some(identity));

        store.clear();
        assert_eq!(store.load(), None);
        // Clearing twice is fine.
        store.clear();
    }

    #[test]
    fn corrupt_session_file_is_discarded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SESSION_FILENAME);
        std::fs::write(&path, "not json").expect("write");

        let store = SessionStore::new_with_path(Some(path));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn pathless_store_is_inert() {
        let store = SessionStore::new_with_path(None);
        let identity = SessionIdentity::new(1, "x".to_string(), "x@x".to_string());
        store.save(&identity);
        assert_eq!(store.load(), None);
        store.clear();
    }
}
