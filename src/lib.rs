//! focal - Daily Focus Tracker Library
//!
//! This library provides the core functionality for the focal CLI tool:
//! one task per day, completion streaks, and a rolling history window.
//!
//! # Core Concepts
//!
//! - **Identity**: usernames map to stable user ids, created on first login
//! - **Task Lifecycle**: at most one current task per user per day, with
//!   incomplete tasks rolling over at the day boundary
//! - **Streak Engine**: consecutive-day completion streaks with an
//!   idempotent completion log
//! - **Query Facade**: read-only views for presentation layers
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `clock`: clock capability and calendar-day projection
//! - `config`: configuration loading from `focal.toml`
//! - `error`: error types and result aliases
//! - `id`: identifier generation capability
//! - `identity`: username registry
//! - `lifecycle`: task creation, completion, rollover
//! - `lock`: file locking and atomic writes for concurrency safety
//! - `output`: CLI output envelopes
//! - `query`: read-only composite views
//! - `session`: persisted device session for the CLI
//! - `storage`: file storage and data-directory layout
//! - `streak`: streak computation and completion history

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod id;
pub mod identity;
pub mod lifecycle;
pub mod lock;
pub mod output;
pub mod query;
pub mod session;
pub mod storage;
pub mod streak;

pub use error::{Error, Result};
