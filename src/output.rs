//! What tick prints.
//!
//! People get a short [`Report`]: a title, a few labelled facts, the task
//! rows, the "N tasks left" line, then warnings and a hint. Scripts pass
//! `--json` and get the same data wrapped in a `tick.v1` envelope.

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::error::{Error, Result};
use crate::task::TaskId;
use crate::ui::task_list::model::Row;

pub const SCHEMA_VERSION: &str = "tick.v1";

/// Global flags that consume the following argument
const VALUE_FLAGS: [&str; 3] = ["--config", "--data-dir", "--slot"];

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// One rendered row, numbered the way `mv` expects positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskLine {
    pub position: usize,
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

impl TaskLine {
    /// Number rows from 1 in rendered order
    pub fn from_rows(rows: &[Row]) -> Vec<TaskLine> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| TaskLine {
                position: idx + 1,
                id: row.id,
                text: row.text.clone(),
                completed: row.completed,
            })
            .collect()
    }

    fn render(&self, text_width: usize) -> String {
        let mark = if self.completed { "[x]" } else { "[ ]" };
        let text = one_line(&self.text);
        let pad = text_width.saturating_sub(text.width());
        format!(
            "{:>3}. {mark} {text}{}  #{}",
            self.position,
            " ".repeat(pad),
            self.id
        )
    }
}

fn one_line(text: &str) -> String {
    text.replace(|ch: char| ch.is_control(), " ")
}

/// Plain-text result of one command
#[derive(Debug, Clone, Default)]
pub struct Report {
    title: String,
    facts: Vec<(&'static str, String)>,
    tasks: Vec<TaskLine>,
    count: Option<String>,
    warnings: Vec<String>,
    hint: Option<String>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn fact(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.facts.push((label, value.into()));
        self
    }

    /// Label a task's id and text
    pub fn task(self, id: TaskId, text: &str) -> Self {
        self.fact("id", id.to_string()).fact("text", one_line(text))
    }

    pub fn rows(mut self, tasks: &[TaskLine]) -> Self {
        self.tasks = tasks.to_vec();
        self
    }

    /// The "N tasks left" line
    pub fn count(mut self, count: impl Into<String>) -> Self {
        self.count = Some(count.into());
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn render(&self) -> String {
        let mut lines = vec![self.title.clone()];

        let label_width = self.facts.iter().map(|(label, _)| label.len()).max();
        for (label, value) in &self.facts {
            let width = label_width.unwrap_or(0);
            lines.push(format!("  {label:<width$}  {value}"));
        }

        let text_width = self
            .tasks
            .iter()
            .map(|task| one_line(&task.text).width())
            .max()
            .unwrap_or(0);
        lines.extend(self.tasks.iter().map(|task| task.render(text_width)));

        if let Some(count) = &self.count {
            lines.push(count.clone());
        }
        for warning in &self.warnings {
            lines.push(format!("warning: {warning}"));
        }
        if let Some(hint) = &self.hint {
            lines.push(format!("hint: {hint}"));
        }
        lines.join("\n")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Success,
    Error,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'a str>,
}

/// Print a successful command's result
pub fn emit<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    report: &Report,
) -> Result<()> {
    if options.json {
        let envelope = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: Status::Success,
            data: Some(data),
            error: None,
            warnings: report.warnings.clone(),
            hint: report.hint.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else if !options.quiet {
        println!("{}", report.render());
    }
    Ok(())
}

/// Print a failed command's error: an envelope on stdout with `--json`,
/// otherwise `error:`/`hint:` lines on stderr
pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hint = error_hint(err);
    if json {
        let envelope: Envelope<'_, ()> = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: Status::Error,
            data: None,
            error: Some(ErrorBody {
                message: err.to_string(),
                code: err.exit_code(),
                kind: err.kind(),
                details: err.details(),
            }),
            warnings: Vec::new(),
            hint,
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// First non-flag argument, skipping the values of global flags; `ui` when
/// there is none
pub fn infer_command_name_from_args() -> String {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            args.next();
            continue;
        }
        if !arg.starts_with('-') {
            return arg;
        }
    }
    "ui".to_string()
}

fn error_hint(err: &Error) -> Option<&'static str> {
    match err {
        Error::InvalidConfig(_) | Error::TomlParse(_) => {
            Some("fix config.toml (or pass --config) then retry")
        }
        Error::DataDirUnavailable => Some("tick --data-dir <path> list"),
        Error::LockFailed(_) => Some("close other tick sessions then retry"),
        Error::SlotUnreadable(_) => Some("close other tick sessions, then retry"),
        Error::InvalidArgument(_) => Some("tick --help"),
        _ => None,
    }
}
