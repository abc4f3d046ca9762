//! Storage layer for focal
//!
//! All state lives under a single data directory:
//!
//! ```text
//! <data_dir>/
//!   users.json              # username -> user registry
//!   session                 # current username on this device (CLI only)
//!   users/<user_id>/
//!     tasks.jsonl           # append-only task log; newest entry is current
//!     streak.json           # streak record
//!     completed.jsonl       # append-only completion-day log
//! ```
//!
//! JSON documents are published atomically (temp + rename). The JSONL
//! logs are append-only; each append and each read-modify-write sequence
//! runs under the owning scope's sidecar lock (`users.json.lock` for the
//! registry, `users/<id>/user.lock` for everything belonging to a user).

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;
use crate::lock::{self, FileLock};

const USERS_FILE: &str = "users.json";
const USERS_DIR: &str = "users";
const SESSION_FILE: &str = "session";
const TASKS_LOG: &str = "tasks.jsonl";
const STREAK_FILE: &str = "streak.json";
const COMPLETED_LOG: &str = "completed.jsonl";
const USER_LOCK: &str = "user.lock";

/// Storage manager rooted at the focal data directory.
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
    lock_timeout_ms: u64,
}

impl Storage {
    pub fn new(data_dir: PathBuf, lock_timeout_ms: u64) -> Self {
        Self {
            data_dir,
            lock_timeout_ms,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn lock_timeout_ms(&self) -> u64 {
        self.lock_timeout_ms
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    /// Path to the username registry
    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    /// Path to the device session file
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    /// Directory holding a user's state
    pub fn user_dir(&self, user_id: &str) -> PathBuf {
        self.data_dir.join(USERS_DIR).join(user_id)
    }

    /// Path to a user's append-only task log
    pub fn tasks_log(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join(TASKS_LOG)
    }

    /// Path to a user's streak record
    pub fn streak_file(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join(STREAK_FILE)
    }

    /// Path to a user's append-only completion-day log
    pub fn completed_log(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join(COMPLETED_LOG)
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Lock serializing writers of the username registry.
    pub fn lock_registry(&self) -> Result<FileLock> {
        let lock_path = lock::lock_path_for(&self.users_file());
        FileLock::acquire(lock_path, self.lock_timeout_ms)
    }

    /// Lock serializing all writes for one user.
    ///
    /// Held across the whole read-then-write of a mutation so the
    /// duplicate-completion check and the streak update behave as one
    /// unit. Different users never contend.
    pub fn lock_user(&self, user_id: &str) -> Result<FileLock> {
        let lock_path = self.user_dir(user_id).join(USER_LOCK);
        FileLock::acquire(lock_path, self.lock_timeout_ms)
    }

    // =========================================================================
    // File I/O helpers
    // =========================================================================

    /// Write a JSON document atomically (temp + rename).
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        lock::write_atomic(path, json.as_bytes())
    }

    /// Read a JSON document, or `None` if the file does not exist.
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Append one record to a JSONL log.
    ///
    /// Not atomic on its own; callers hold the owning scope's lock.
    pub fn append_jsonl<T: Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(record)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        writeln!(file, "{}", json)?;
        file.sync_all()?;

        Ok(())
    }

    /// Read all records from a JSONL log (empty if absent).
    pub fn read_jsonl<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: T = serde_json::from_str(&line)?;
            records.push(record);
        }

        Ok(records)
    }
}
