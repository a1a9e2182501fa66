use crate::task::{Filter, Task, TaskId};

/// One displayed task row.
///
/// Every row exposes a completion toggle, the text and a delete control, and
/// is both a drag source and a drop target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub draggable: bool,
}

impl Row {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            text: task.text.clone(),
            completed: task.completed,
            draggable: true,
        }
    }

    /// Checkbox glyph for the completion toggle
    pub fn checkbox(&self) -> &'static str {
        if self.completed {
            "[x]"
        } else {
            "[ ]"
        }
    }
}

/// Filtered subsequence, preserving relative order
pub fn filter_tasks(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

pub fn build_rows(tasks: &[Task], filter: Filter) -> Vec<Row> {
    filter_tasks(tasks, filter)
        .into_iter()
        .map(Row::from_task)
        .collect()
}

/// Not-completed tasks across the whole list, regardless of filter
pub fn active_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|task| !task.completed).count()
}

pub fn count_label(active: usize) -> String {
    let plural = if active == 1 { "" } else { "s" };
    format!("{active} task{plural} left")
}

pub fn position_of(rows: &[Row], id: TaskId) -> Option<usize> {
    rows.iter().position(|row| row.id == id)
}

/// Cursor position for `previous_id`, or the nearest valid position
pub fn select_by_id(rows: &[Row], previous_id: Option<TaskId>, fallback: usize) -> Option<usize> {
    if rows.is_empty() {
        return None;
    }
    if let Some(pos) = previous_id.and_then(|id| position_of(rows, id)) {
        return Some(pos);
    }
    Some(fallback.min(rows.len() - 1))
}

/// Visible `[start, end)` window of `total` rows keeping `selected` in view
pub fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}
