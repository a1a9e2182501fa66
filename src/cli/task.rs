//! tick command implementations.
//!
//! Every command opens the store, applies the same gestures the terminal UI
//! would, and prints what the rebuilt surface shows.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit, OutputOptions, Report, TaskLine};
use crate::storage::{validate_slot_name, FsSlots};
use crate::store::TaskStore;
use crate::task::{Filter, Task, TaskId};
use crate::ui::task_list::{self, model, BufferSurface, Controller, Gesture};

/// Where the list lives: config file plus flag overrides
pub struct StoreArgs {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub slot: Option<String>,
}

pub struct UiOptions {
    pub store: StoreArgs,
    pub no_mouse: bool,
}

pub struct AddOptions {
    pub text: String,
    pub store: StoreArgs,
    pub output: OutputOptions,
}

pub struct ListOptions {
    pub filter: Filter,
    pub store: StoreArgs,
    pub output: OutputOptions,
}

pub struct IdOptions {
    pub id: TaskId,
    pub store: StoreArgs,
    pub output: OutputOptions,
}

pub struct ClearOptions {
    pub store: StoreArgs,
    pub output: OutputOptions,
}

pub struct MoveOptions {
    pub from: usize,
    pub to: usize,
    pub filter: Filter,
    pub store: StoreArgs,
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct TaskListOutput {
    filter: Filter,
    total: usize,
    remaining: usize,
    count: String,
    tasks: Vec<TaskLine>,
}

#[derive(Serialize)]
struct TaskAddedOutput {
    task: Option<Task>,
    count: String,
}

#[derive(Serialize)]
struct TaskChangedOutput {
    id: TaskId,
    changed: bool,
    task: Option<Task>,
    count: String,
}

#[derive(Serialize)]
struct ClearOutput {
    removed: usize,
    count: String,
}

#[derive(Serialize)]
struct MoveOutput {
    filter: Filter,
    from: usize,
    to: usize,
    moved: bool,
    tasks: Vec<TaskLine>,
}

struct TaskContext {
    controller: Controller<FsSlots>,
    surface: BufferSurface,
}

impl TaskContext {
    fn handle(&mut self, gesture: Gesture) -> Result<()> {
        self.controller.handle(gesture, &mut self.surface)?;
        Ok(())
    }

    fn snapshot(&self) -> &[Task] {
        self.controller.store().snapshot()
    }

    fn task(&self, id: TaskId) -> Option<Task> {
        self.controller.store().get(id).cloned()
    }

    fn lines(&self) -> Vec<TaskLine> {
        TaskLine::from_rows(self.surface.rows())
    }

    fn count(&self) -> String {
        self.surface.count().to_string()
    }

    /// Attach the unreadable-list warning, if any
    fn warn_if_unread(&self, mut report: Report) -> Report {
        let store = self.controller.store();
        if store.load_failed() {
            report.warn(format!(
                "task list '{}' could not be read; showing an empty list",
                store.slot()
            ));
        }
        report
    }
}

fn open_store(args: StoreArgs) -> Result<(Config, TaskStore<FsSlots>)> {
    let config = Config::load_or_default(args.config.as_deref())?;
    let dir = config.data_dir(args.data_dir.as_deref())?;
    let slot = args.slot.unwrap_or_else(|| config.storage.slot.clone());
    validate_slot_name(&slot)?;
    tracing::debug!(dir = %dir.display(), slot = %slot, "opening task store");
    let slots = FsSlots::new(dir).with_lock_timeout(config.storage.lock_timeout_ms);
    let store = TaskStore::open(slots, slot);
    Ok((config, store))
}

fn load_context(args: StoreArgs) -> Result<TaskContext> {
    let (_, store) = open_store(args)?;
    let controller = Controller::new(store);
    let mut surface = BufferSurface::new();
    controller.refresh(&mut surface);
    Ok(TaskContext {
        controller,
        surface,
    })
}

pub fn run_ui(options: UiOptions) -> Result<()> {
    let (config, store) = open_store(options.store)?;
    task_list::run(
        store,
        task_list::UiOptions {
            mouse: config.ui.mouse && !options.no_mouse,
            poll_ms: config.ui.poll_ms,
        },
    )
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = load_context(options.store)?;
    let before = ctx.snapshot().len();
    ctx.surface.set_input(options.text);
    ctx.handle(Gesture::Submit)?;

    let task = if ctx.snapshot().len() > before {
        ctx.snapshot().last().cloned()
    } else {
        None
    };
    let count = ctx.count();

    let report = match task.as_ref() {
        Some(task) => Report::new("Task added").task(task.id, &task.text),
        None => {
            let mut report = Report::new("Nothing added");
            report.warn("task text is blank");
            report
        }
    };
    let report = ctx.warn_if_unread(report.count(count.clone()));

    emit(options.output, "add", &TaskAddedOutput { task, count }, &report)
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let mut ctx = load_context(options.store)?;
    ctx.handle(Gesture::SelectFilter(options.filter))?;

    let output = TaskListOutput {
        filter: options.filter,
        total: ctx.snapshot().len(),
        remaining: model::active_count(ctx.snapshot()),
        count: ctx.count(),
        tasks: ctx.lines(),
    };

    let mut report = Report::new(format!("Tasks ({})", options.filter))
        .rows(&output.tasks)
        .count(output.count.clone());
    if output.total == 0 {
        report = report.hint("tick add <text>");
    } else if output.tasks.is_empty() {
        report = report.hint("tick list --filter all");
    }
    let report = ctx.warn_if_unread(report);

    emit(options.output, "list", &output, &report)
}

/// Shared body of `toggle` and `rm`
fn change_report(ctx: &TaskContext, title: &str, id: TaskId, task: Option<&Task>) -> Report {
    let report = match task {
        Some(task) => Report::new(title).task(task.id, &task.text),
        None => {
            let mut report = Report::new("Task unchanged").hint("tick list");
            report.warn(format!("no task with id {id}"));
            report
        }
    };
    ctx.warn_if_unread(report.count(ctx.count()))
}

pub fn run_toggle(options: IdOptions) -> Result<()> {
    let mut ctx = load_context(options.store)?;
    let changed = ctx.task(options.id).is_some();
    ctx.handle(Gesture::Toggle(options.id))?;
    let task = ctx.task(options.id);

    let title = match task.as_ref() {
        Some(task) if task.completed => "Task completed",
        _ => "Task reopened",
    };
    let report = change_report(&ctx, title, options.id, task.as_ref());

    emit(
        options.output,
        "toggle",
        &TaskChangedOutput {
            id: options.id,
            changed,
            task,
            count: ctx.count(),
        },
        &report,
    )
}

pub fn run_rm(options: IdOptions) -> Result<()> {
    let mut ctx = load_context(options.store)?;
    let task = ctx.task(options.id);
    ctx.handle(Gesture::Delete(options.id))?;
    let report = change_report(&ctx, "Task deleted", options.id, task.as_ref());

    emit(
        options.output,
        "rm",
        &TaskChangedOutput {
            id: options.id,
            changed: task.is_some(),
            task,
            count: ctx.count(),
        },
        &report,
    )
}

pub fn run_clear(options: ClearOptions) -> Result<()> {
    let mut ctx = load_context(options.store)?;
    let before = ctx.snapshot().len();
    ctx.handle(Gesture::ClearCompleted)?;
    let removed = before - ctx.snapshot().len();
    let count = ctx.count();

    let title = match removed {
        0 => "No completed tasks".to_string(),
        1 => "Cleared 1 completed task".to_string(),
        n => format!("Cleared {n} completed tasks"),
    };
    let report = ctx.warn_if_unread(Report::new(title).count(count.clone()));

    emit(options.output, "clear", &ClearOutput { removed, count }, &report)
}

pub fn run_mv(options: MoveOptions) -> Result<()> {
    if options.from == 0 || options.to == 0 {
        return Err(Error::InvalidArgument(
            "positions start at 1 (see `tick list`)".to_string(),
        ));
    }

    let mut ctx = load_context(options.store)?;
    ctx.handle(Gesture::SelectFilter(options.filter))?;
    let before: Vec<TaskId> = ctx.snapshot().iter().map(|task| task.id).collect();

    let source = ctx.surface.row_at(options.from - 1).map(|row| row.id);
    let target = ctx.surface.row_at(options.to - 1).map(|row| row.id);
    let mut warning = None;
    match (source, target) {
        (Some(source), Some(target)) => {
            ctx.handle(Gesture::DragStart(source))?;
            ctx.handle(Gesture::DragOver(target))?;
            ctx.handle(Gesture::Drop(target))?;
            ctx.handle(Gesture::DragEnd)?;
        }
        _ => {
            warning = Some(format!(
                "positions must be between 1 and {} for filter '{}'",
                ctx.surface.rows().len(),
                options.filter
            ));
        }
    }

    let moved = ctx
        .snapshot()
        .iter()
        .map(|task| task.id)
        .ne(before.iter().copied());
    let output = MoveOutput {
        filter: options.filter,
        from: options.from,
        to: options.to,
        moved,
        tasks: ctx.lines(),
    };

    let title = if moved {
        format!("Moved {} -> {}", options.from, options.to)
    } else {
        "Order unchanged".to_string()
    };
    let mut report = Report::new(title).rows(&output.tasks);
    if let Some(warning) = warning {
        report.warn(warning);
    }
    let report = ctx.warn_if_unread(report);

    emit(options.output, "mv", &output, &report)
}
