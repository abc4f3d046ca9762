//! Command-line interface for focal
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::clock::{Clock, SystemClock};
use crate::config::{resolve_data_dir, Config};
use crate::error::{Error, Result};
use crate::id::UlidGenerator;
use crate::identity::{IdentityStore, User};
use crate::lifecycle::TaskLifecycle;
use crate::query::QueryFacade;
use crate::session;
use crate::storage::Storage;
use crate::streak::StreakEngine;

mod login;
mod streak;
mod task;

/// focal - Daily Focus Tracker
///
/// Log in with a username, set one task for the day, mark it done, and
/// keep a completion streak going.
#[derive(Parser, Debug)]
#[command(name = "focal")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "FOCAL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Act as this username instead of the logged-in session
    #[arg(long, global = true, env = "FOCAL_USER")]
    pub user: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in (creating the user on first login) and remember the session
    Login {
        /// Username to log in as
        username: String,
    },

    /// Forget the session on this device
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage today's task
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show the current streak and completion history
    Streak,

    /// Show the rolling completion window
    Week {
        /// Number of days in the window (defaults to config, normally 7)
        #[arg(long)]
        days: Option<usize>,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Set today's focus task
    Set {
        /// Task text
        text: String,
    },

    /// Show the current task
    Show,

    /// Complete the current task and record today in the streak
    Done,
}

/// Everything a command needs, wired from the data directory.
pub(crate) struct Context {
    pub storage: Storage,
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub identity: IdentityStore,
    pub lifecycle: TaskLifecycle,
    pub streak: StreakEngine,
    pub query: QueryFacade,
}

impl Context {
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir)?;
        let config = Config::load_from_data_dir(&data_dir);
        let storage = Storage::new(data_dir, config.storage.lock_timeout_ms);

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let ids = Arc::new(UlidGenerator);

        let identity = IdentityStore::new(storage.clone(), ids.clone(), clock.clone());
        let lifecycle = TaskLifecycle::new(storage.clone(), ids, clock.clone());
        let streak = StreakEngine::new(
            storage.clone(),
            clock.clone(),
            config.streaks.history_limit,
        );
        let query = QueryFacade::new(
            lifecycle.clone(),
            streak.clone(),
            config.streaks.window_days,
        );

        Ok(Self {
            storage,
            config,
            clock,
            identity,
            lifecycle,
            streak,
            query,
        })
    }

    /// Resolve the acting user: session resolution, then registry lookup.
    pub fn require_user(&self, cli_user: Option<&str>) -> Result<User> {
        let username = session::resolve_username(&self.storage, cli_user)?;
        self.identity
            .find_by_username(&username)?
            .ok_or(Error::UserNotFound(username))
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Login { username } => login::run_login(login::LoginOptions {
                username,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Logout => login::run_logout(login::LogoutOptions {
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Whoami => login::run_whoami(login::WhoamiOptions {
                user: self.user,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Task(cmd) => match cmd {
                TaskCommands::Set { text } => task::run_set(task::SetOptions {
                    text,
                    user: self.user,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Show => task::run_show(task::ShowOptions {
                    user: self.user,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Done => task::run_done(task::DoneOptions {
                    user: self.user,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Streak => streak::run_streak(streak::StreakOptions {
                user: self.user,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Week { days } => streak::run_week(streak::WeekOptions {
                days,
                user: self.user,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}
