//! focal login / logout / whoami command implementations

use std::path::PathBuf;

use crate::error::Result;
use crate::identity::User;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::session;

use super::Context;

pub struct LoginOptions {
    pub username: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct LoginReport {
    user: User,
    created: bool,
}

pub fn run_login(opts: LoginOptions) -> Result<()> {
    let ctx = Context::resolve(opts.data_dir)?;

    let existing = ctx.identity.find_by_username(opts.username.trim())?;
    let user = ctx.identity.login(&opts.username)?;
    let created = existing.is_none();

    session::persist_session(&ctx.storage, &user.username)?;

    let report = LoginReport {
        user: user.clone(),
        created,
    };

    let header = if created {
        format!("focal login: welcome, {}", user.username)
    } else {
        format!("focal login: welcome back, {}", user.username)
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("user", user.username.clone());
    human.push_summary("id", user.id.clone());
    human.push_next_step("focal task set \"<today's focus>\"");

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "login",
        &report,
        Some(&human),
    )
}

pub struct LogoutOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct LogoutReport {
    cleared: bool,
}

pub fn run_logout(opts: LogoutOptions) -> Result<()> {
    let ctx = Context::resolve(opts.data_dir)?;
    let cleared = session::clear_session(&ctx.storage)?;

    let header = if cleared {
        "focal logout: session cleared"
    } else {
        "focal logout: no session to clear"
    };

    let human = HumanOutput::new(header);

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "logout",
        &LogoutReport { cleared },
        Some(&human),
    )
}

pub struct WhoamiOptions {
    pub user: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct WhoamiReport {
    user: User,
}

pub fn run_whoami(opts: WhoamiOptions) -> Result<()> {
    let ctx = Context::resolve(opts.data_dir)?;
    let user = ctx.require_user(opts.user.as_deref())?;

    let mut human = HumanOutput::new(format!("focal whoami: {}", user.username));
    human.push_summary("user", user.username.clone());
    human.push_summary("id", user.id.clone());
    human.push_summary("since", user.created_at.to_rfc3339());

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "whoami",
        &WhoamiReport { user },
        Some(&human),
    )
}
