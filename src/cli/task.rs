//! focal task set / show / done command implementations

use std::path::PathBuf;

use crate::clock::{calendar_day, Clock};
use crate::error::{Error, Result};
use crate::lifecycle::Task;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::query::{TaskState, TaskView};
use crate::streak::StreakSummary;

use super::Context;

pub struct SetOptions {
    pub text: String,
    pub user: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct SetReport {
    task: Task,
}

pub fn run_set(opts: SetOptions) -> Result<()> {
    let ctx = Context::resolve(opts.data_dir)?;
    let user = ctx.require_user(opts.user.as_deref())?;

    let task = ctx.lifecycle.create_task(&user.id, &opts.text)?;

    let mut human = HumanOutput::new("focal task: focus set");
    human.push_summary("task", task.text.clone());
    human.push_next_step("focal task done");

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "task set",
        &SetReport { task },
        Some(&human),
    )
}

pub struct ShowOptions {
    pub user: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_show(opts: ShowOptions) -> Result<()> {
    let ctx = Context::resolve(opts.data_dir)?;
    let user = ctx.require_user(opts.user.as_deref())?;

    let view = ctx.query.current_task_view(&user.id)?;
    let human = render_task_view(&view);

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "task show",
        &view,
        Some(&human),
    )
}

pub struct DoneOptions {
    pub user: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct DoneReport {
    task: Task,
    streak: StreakSummary,
}

pub fn run_done(opts: DoneOptions) -> Result<()> {
    let ctx = Context::resolve(opts.data_dir)?;
    let user = ctx.require_user(opts.user.as_deref())?;

    let current = ctx
        .lifecycle
        .current_task(&user.id)?
        .ok_or_else(|| Error::TaskNotFound("no current task to complete".to_string()))?;

    let completed_at = ctx.clock.now();
    let task = ctx
        .lifecycle
        .complete_task(&current.id, &user.id, completed_at)?;
    ctx.streak
        .record_completion(&user.id, calendar_day(completed_at))?;

    let streak = ctx.streak.summary(&user.id)?;

    let mut human = HumanOutput::new(format!(
        "focal task: done - streak is {} day{}",
        streak.current_streak,
        if streak.current_streak == 1 { "" } else { "s" }
    ));
    human.push_summary("task", task.text.clone());
    human.push_summary("streak", streak.current_streak.to_string());
    human.push_next_step("focal week");

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "task done",
        &DoneReport { task, streak },
        Some(&human),
    )
}

fn render_task_view(view: &TaskView) -> HumanOutput {
    match (&view.state, &view.task) {
        (TaskState::None, _) | (_, None) => {
            let mut human = HumanOutput::new("focal task: no focus set for today");
            human.push_next_step("focal task set \"<today's focus>\"");
            human
        }
        (state, Some(task)) => {
            let mut human = HumanOutput::new(format!("focal task: {}", task.text));
            human.push_summary(
                "status",
                match state {
                    TaskState::Done => "done",
                    _ => "pending",
                },
            );
            human.push_summary("created", calendar_day(task.created_at).to_string());
            if matches!(state, TaskState::Pending) {
                human.push_next_step("focal task done");
            }
            human
        }
    }
}
