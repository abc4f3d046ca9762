//! focal streak / week command implementations

use std::path::PathBuf;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::streak::DayMark;

use super::Context;

pub struct StreakOptions {
    pub user: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_streak(opts: StreakOptions) -> Result<()> {
    let ctx = Context::resolve(opts.data_dir)?;
    let user = ctx.require_user(opts.user.as_deref())?;

    let summary = ctx.streak.summary(&user.id)?;

    let mut human = HumanOutput::new(format!(
        "focal streak: {} day{}",
        summary.current_streak,
        if summary.current_streak == 1 { "" } else { "s" }
    ));
    human.push_summary(
        "last completed",
        summary
            .last_completed_date
            .map(|day| day.to_string())
            .unwrap_or_else(|| "never".to_string()),
    );
    human.push_summary("days recorded", summary.completed_dates.len().to_string());
    for day in &summary.completed_dates {
        human.push_detail(day.to_string());
    }

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "streak",
        &summary,
        Some(&human),
    )
}

pub struct WeekOptions {
    pub days: Option<usize>,
    pub user: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct WeekReport {
    days: Vec<DayMark>,
}

pub fn run_week(opts: WeekOptions) -> Result<()> {
    let ctx = Context::resolve(opts.data_dir)?;
    let user = ctx.require_user(opts.user.as_deref())?;

    let days = opts.days.unwrap_or(ctx.config.streaks.window_days);
    let window = ctx.streak.last_n_days(&user.id, days)?;

    let completed = window.iter().filter(|mark| mark.completed).count();
    let mut human = HumanOutput::new(format!(
        "focal week: {completed} of {} day{} completed",
        window.len(),
        if window.len() == 1 { "" } else { "s" }
    ));
    for mark in &window {
        human.push_detail(format!(
            "{} {}",
            mark.day,
            if mark.completed { "done" } else { "-" }
        ));
    }

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "week",
        &WeekReport { days: window },
        Some(&human),
    )
}
