//! Display surface the task list is materialized onto
//!
//! A surface is the host's retained display tree: a list of rows that can be
//! cleared and appended to, a count label, a set of filter controls with one
//! marked active, and a single-line input field. The terminal UI paints a
//! [`BufferSurface`]; the CLI prints one; tests inspect one.

use std::collections::HashSet;

use crate::task::{Filter, TaskId};

use super::model::{self, Row};

pub trait Surface {
    /// Remove every row from the list
    fn clear_list(&mut self);

    fn append_row(&mut self, row: Row);

    /// Position of a row within the currently rendered list
    fn row_position(&self, id: TaskId) -> Option<usize>;

    /// Visually de-emphasize (or restore) a row
    fn set_dimmed(&mut self, id: TaskId, dimmed: bool);

    fn set_count(&mut self, label: &str);

    /// Mark exactly one filter control as active
    fn set_active_filter(&mut self, filter: Filter);

    fn input_text(&self) -> String;

    fn clear_input(&mut self);
}

/// In-memory surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferSurface {
    rows: Vec<Row>,
    dimmed: HashSet<TaskId>,
    count: String,
    active_filter: Filter,
    input: String,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_at(&self, pos: usize) -> Option<&Row> {
        self.rows.get(pos)
    }

    pub fn is_dimmed(&self, id: TaskId) -> bool {
        self.dimmed.contains(&id)
    }

    pub fn count(&self) -> &str {
        &self.count
    }

    pub fn active_filter(&self) -> Filter {
        self.active_filter
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    pub fn push_input(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }
}

impl Surface for BufferSurface {
    fn clear_list(&mut self) {
        self.rows.clear();
        self.dimmed.clear();
    }

    fn append_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    fn row_position(&self, id: TaskId) -> Option<usize> {
        model::position_of(&self.rows, id)
    }

    fn set_dimmed(&mut self, id: TaskId, dimmed: bool) {
        if !dimmed {
            self.dimmed.remove(&id);
        } else if self.row_position(id).is_some() {
            self.dimmed.insert(id);
        }
    }

    fn set_count(&mut self, label: &str) {
        self.count = label.to_string();
    }

    fn set_active_filter(&mut self, filter: Filter) {
        self.active_filter = filter;
    }

    fn input_text(&self) -> String {
        self.input.clone()
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }
}
