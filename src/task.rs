//! Task records and filter modes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Opaque task identifier.
///
/// Serialized as a bare JSON number so snapshots stay `{"id": 1700000000000, ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(TaskId)
            .map_err(|_| Error::InvalidArgument(format!("invalid task id '{s}'")))
    }
}

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

impl Task {
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

/// Issues strictly increasing ids seeded from the wall clock.
///
/// Ids are millisecond timestamps; when the clock has not moved past the last
/// issued id, the next id is `last + 1`. Deleted ids are never handed out
/// again because `last` only grows.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Start above every id already present in a loaded list
    pub fn after<'a>(ids: impl IntoIterator<Item = &'a TaskId>) -> Self {
        let last = ids.into_iter().map(|id| id.0).max().unwrap_or(0);
        Self { last }
    }

    /// Next id given the current time in milliseconds
    pub fn next_at(&mut self, now_ms: i64) -> TaskId {
        let now = u64::try_from(now_ms).unwrap_or(0);
        let id = now.max(self.last.saturating_add(1));
        self.last = id;
        TaskId(id)
    }

    /// Next id using the system clock
    pub fn next(&mut self) -> TaskId {
        self.next_at(chrono::Utc::now().timestamp_millis())
    }
}

/// Which subset of tasks is displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// All filters in control order
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Whether a task belongs to this filter's subset
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    /// Next filter in control order, wrapping around
    pub fn cycle(self) -> Self {
        match self {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            other => Err(Error::InvalidArgument(format!(
                "invalid filter '{other}' (expected all|active|completed)"
            ))),
        }
    }
}
