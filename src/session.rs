//! Device session for the CLI.
//!
//! Which user is "logged in" on this device is a concern of the driver,
//! not the core: the library operations all take an explicit user. The
//! CLI resolves the acting username in this order:
//! 1) --user flag (explicit)
//! 2) FOCAL_USER environment variable
//! 3) Persisted session file in the data directory (written by `login`)

use crate::error::{Error, Result};
use crate::lock;
use crate::storage::Storage;

/// Resolve the acting username, or fail with [`Error::NoSession`].
pub fn resolve_username(storage: &Storage, cli_user: Option<&str>) -> Result<String> {
    if let Some(user) = non_empty(cli_user) {
        return Ok(user.to_string());
    }

    if let Ok(env_user) = std::env::var("FOCAL_USER") {
        if let Some(user) = non_empty(Some(env_user.as_str())) {
            return Ok(user.to_string());
        }
    }

    if let Some(user) = load_session(storage)? {
        return Ok(user);
    }

    Err(Error::NoSession)
}

/// Persist the session username (on successful login).
pub fn persist_session(storage: &Storage, username: &str) -> Result<()> {
    let username = non_empty(Some(username))
        .ok_or_else(|| Error::Validation("username cannot be empty".to_string()))?;
    lock::write_atomic(storage.session_file(), format!("{username}\n").as_bytes())
}

/// Load the persisted session username, if any.
pub fn load_session(storage: &Storage) -> Result<Option<String>> {
    let path = storage.session_file();
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)?;
    let username = raw.trim();
    if username.is_empty() {
        return Ok(None);
    }

    Ok(Some(username.to_string()))
}

/// Remove the persisted session. Idempotent.
pub fn clear_session(storage: &Storage) -> Result<bool> {
    let path = storage.session_file();
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path)?;
    Ok(true)
}

fn non_empty(input: Option<&str>) -> Option<&str> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
    use tempfile::TempDir;

    fn storage(temp: &TempDir) -> Storage {
        Storage::new(temp.path().to_path_buf(), DEFAULT_LOCK_TIMEOUT_MS)
    }

    #[test]
    fn flag_wins_over_persisted_session() {
        let temp = TempDir::new().unwrap();
        let storage = storage(&temp);

        persist_session(&storage, "alice").unwrap();
        let resolved = resolve_username(&storage, Some("bob")).unwrap();
        assert_eq!(resolved, "bob");
    }

    #[test]
    fn persisted_session_round_trips() {
        let temp = TempDir::new().unwrap();
        let storage = storage(&temp);

        assert!(load_session(&storage).unwrap().is_none());

        persist_session(&storage, "alice").unwrap();
        assert_eq!(load_session(&storage).unwrap().as_deref(), Some("alice"));

        assert!(clear_session(&storage).unwrap());
        assert!(load_session(&storage).unwrap().is_none());
        assert!(!clear_session(&storage).unwrap());
    }

    #[test]
    fn missing_session_is_an_error() {
        let temp = TempDir::new().unwrap();
        let storage = storage(&temp);

        let err = resolve_username(&storage, None).expect_err("no session");
        assert!(matches!(err, Error::NoSession));
    }

    #[test]
    fn blank_flag_is_ignored() {
        let temp = TempDir::new().unwrap();
        let storage = storage(&temp);

        persist_session(&storage, "alice").unwrap();
        let resolved = resolve_username(&storage, Some("   ")).unwrap();
        assert_eq!(resolved, "alice");
    }
}
