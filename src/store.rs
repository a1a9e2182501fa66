//! Task list store
//!
//! `TaskStore` is the single source of truth for the ordered task list and
//! the only writer of its durable slot. Every mutation that changes the list
//! is followed by a full overwrite of the slot; calls that change nothing
//! (blank text, unknown id, invalid positions) leave the slot alone.
//!
//! A slot that exists but cannot be read (lock timeout, I/O error) still
//! yields an empty list, but the store then refuses to write until it has
//! been reloaded successfully, so the saved list is never clobbered. A write
//! that fails rolls the in-memory change back.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::storage::SlotBackend;
use crate::task::{IdGenerator, Task, TaskId};

/// Ordered task list backed by one durable slot
#[derive(Debug)]
pub struct TaskStore<S> {
    backend: S,
    slot: String,
    tasks: Vec<Task>,
    ids: IdGenerator,
    /// Set when the last `initialize` could not read the slot
    unreadable: bool,
}

impl<S: SlotBackend> TaskStore<S> {
    /// Create an empty, not yet loaded store
    pub fn new(backend: S, slot: impl Into<String>) -> Self {
        Self {
            backend,
            slot: slot.into(),
            tasks: Vec::new(),
            ids: IdGenerator::default(),
            unreadable: false,
        }
    }

    /// Create a store and load its slot
    pub fn open(backend: S, slot: impl Into<String>) -> Self {
        let mut store = Self::new(backend, slot);
        store.initialize();
        store
    }

    /// Load the persisted list, falling back to an empty list.
    ///
    /// A missing, unreadable or unparsable slot is not an error. An
    /// unreadable one blocks writes until the next successful load.
    pub fn initialize(&mut self) {
        self.unreadable = false;
        self.tasks = match self.backend.read(&self.slot) {
            Ok(Some(raw)) => parse_snapshot(&self.slot, &raw),
            Ok(None) => {
                tracing::debug!(slot = %self.slot, "slot empty, starting with no tasks");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(slot = %self.slot, error = %err, "slot unreadable, writes disabled");
                self.unreadable = true;
                Vec::new()
            }
        };
        self.ids = IdGenerator::after(self.tasks.iter().map(|task| &task.id));
    }

    /// Name of the slot this store persists to
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// True when the slot could not be read and writes are refused
    pub fn load_failed(&self) -> bool {
        self.unreadable
    }

    /// Current ordered sequence
    pub fn snapshot(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a task with trimmed `text`.
    ///
    /// Returns the new id, or `None` if the text is blank.
    pub fn add(&mut self, text: &str) -> Result<Option<TaskId>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let id = self.ids.next();
        self.tasks.push(Task::new(id, text));
        tracing::debug!(%id, "task added");
        self.commit(|tasks| {
            tasks.pop();
        })?;
        Ok(Some(id))
    }

    /// Flip `completed` on the matching task
    pub fn toggle(&mut self, id: TaskId) -> Result<bool> {
        let Some(pos) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(false);
        };
        let completed = !self.tasks[pos].completed;
        self.tasks[pos].completed = completed;
        tracing::debug!(%id, completed, "task toggled");
        self.commit(|tasks| tasks[pos].completed = !completed)?;
        Ok(true)
    }

    /// Remove the matching task, keeping the others in order
    pub fn remove(&mut self, id: TaskId) -> Result<bool> {
        let Some(pos) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(false);
        };
        let task = self.tasks.remove(pos);
        tracing::debug!(%id, "task removed");
        self.commit(|tasks| tasks.insert(pos, task))?;
        Ok(true)
    }

    /// Remove every completed task. Returns how many were removed.
    pub fn clear_completed(&mut self) -> Result<usize> {
        if !self.tasks.iter().any(|task| task.completed) {
            return Ok(0);
        }
        let previous = self.tasks.clone();
        self.tasks.retain(|task| !task.completed);
        let removed = previous.len() - self.tasks.len();
        tracing::debug!(removed, "completed tasks cleared");
        self.commit(|tasks| *tasks = previous)?;
        Ok(removed)
    }

    /// Move the task at `from` so it ends up at `to`.
    ///
    /// Move semantics, not swap: `reorder(0, 2)` on `[A, B, C]` gives
    /// `[B, C, A]`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool> {
        let len = self.tasks.len();
        if from == to || from >= len || to >= len {
            return Ok(false);
        }
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        tracing::debug!(from, to, "task moved");
        self.commit(|tasks| {
            let task = tasks.remove(to);
            tasks.insert(from, task);
        })?;
        Ok(true)
    }

    /// Persist the current list, or undo the in-memory change if that fails
    fn commit(&mut self, undo: impl FnOnce(&mut Vec<Task>)) -> Result<()> {
        if let Err(err) = self.persist() {
            undo(&mut self.tasks);
            tracing::warn!(slot = %self.slot, error = %err, "write failed, change rolled back");
            return Err(err);
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        if self.unreadable {
            return Err(Error::SlotUnreadable(self.slot.clone()));
        }
        let json = serde_json::to_string(&self.tasks)?;
        self.backend.write(&self.slot, &json)?;
        tracing::debug!(slot = %self.slot, tasks = self.tasks.len(), "slot written");
        Ok(())
    }
}

fn parse_snapshot(slot: &str, raw: &str) -> Vec<Task> {
    let tasks: Vec<Task> = match serde_json::from_str(raw) {
        Ok(tasks) => tasks,
        Err(err) => {
            tracing::warn!(slot, error = %err, "slot unparsable, starting with no tasks");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let before = tasks.len();
    let tasks: Vec<Task> = tasks
        .into_iter()
        .filter(|task| seen.insert(task.id))
        .collect();
    if tasks.len() != before {
        tracing::warn!(slot, dropped = before - tasks.len(), "duplicate task ids dropped");
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemSlots, DEFAULT_SLOT};

    fn store_with(slots: &MemSlots) -> TaskStore<&MemSlots> {
        TaskStore::open(slots, DEFAULT_SLOT)
    }

    fn texts<S: SlotBackend>(store: &TaskStore<S>) -> Vec<&str> {
        store.snapshot().iter().map(|task| task.text.as_str()).collect()
    }

    fn seeded<'a>(slots: &'a MemSlots, items: &[(&str, bool)]) -> TaskStore<&'a MemSlots> {
        let mut store = store_with(slots);
        for (text, completed) in items {
            let id = store.add(text).unwrap().expect("id");
            if *completed {
                store.toggle(id).unwrap();
            }
        }
        store
    }

    #[test]
    fn add_to_empty_list_creates_one_active_task() {
        let slots = MemSlots::new();
        let mut store = store_with(&slots);

        let id = store.add("Buy milk").unwrap().expect("task created");
        assert_eq!(store.len(), 1);
        let task = store.get(id).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(slots.write_count(), 1);
    }

    #[test]
    fn add_trims_text() {
        let slots = MemSlots::new();
        let mut store = store_with(&slots);
        store.add("  Walk dog \n").unwrap();
        assert_eq!(texts(&store), vec!["Walk dog"]);
    }

    #[test]
    fn blank_add_is_ignored_and_not_persisted() {
        let slots = MemSlots::new();
        let mut store = store_with(&slots);

        assert_eq!(store.add("    ").unwrap(), None);
        assert_eq!(store.add("").unwrap(), None);
        assert!(store.is_empty());
        assert_eq!(slots.write_count(), 0);
        assert!(slots.raw(DEFAULT_SLOT).is_none());
    }

    #[test]
    fn ids_are_unique_and_never_reused() {
        let slots = MemSlots::new();
        let mut store = store_with(&slots);
        let a = store.add("a").unwrap().unwrap();
        let b = store.add("b").unwrap().unwrap();
        assert_ne!(a, b);
        store.remove(b).unwrap();
        let c = store.add("c").unwrap().unwrap();
        assert!(c > b);
    }

    #[test]
    fn double_toggle_restores_state_and_order() {
        let slots = MemSlots::new();
        let mut store = seeded(&slots, &[("A", false), ("B", false), ("C", false)]);
        let id = store.snapshot()[1].id;

        assert!(store.toggle(id).unwrap());
        assert!(store.get(id).unwrap().completed);
        assert!(store.toggle(id).unwrap());
        assert!(!store.get(id).unwrap().completed);
        assert_eq!(texts(&store), vec!["A", "B", "C"]);
    }

    #[test]
    fn unknown_ids_are_noops_without_writes() {
        let slots = MemSlots::new();
        let mut store = seeded(&slots, &[("A", false)]);
        let writes = slots.write_count();

        assert!(!store.toggle(TaskId::new(1)).unwrap());
        assert!(!store.remove(TaskId::new(1)).unwrap());
        assert_eq!(slots.write_count(), writes);
        assert_eq!(texts(&store), vec!["A"]);
    }

    #[test]
    fn remove_preserves_order_of_rest() {
        let slots = MemSlots::new();
        let mut store = seeded(&slots, &[("A", false), ("B", false), ("C", false)]);
        let b = store.snapshot()[1].id;
        assert!(store.remove(b).unwrap());
        assert_eq!(texts(&store), vec!["A", "C"]);
    }

    #[test]
    fn clear_completed_keeps_survivors_in_order() {
        let slots = MemSlots::new();
        let mut store = seeded(&slots, &[("A", true), ("B", false), ("C", true)]);

        assert_eq!(store.clear_completed().unwrap(), 2);
        assert_eq!(texts(&store), vec!["B"]);

        let writes = slots.write_count();
        assert_eq!(store.clear_completed().unwrap(), 0);
        assert_eq!(slots.write_count(), writes);
    }

    #[test]
    fn reorder_moves_instead_of_swapping() {
        let slots = MemSlots::new();
        let mut store = seeded(&slots, &[("A", false), ("B", false), ("C", false)]);
        assert!(store.reorder(0, 2).unwrap());
        assert_eq!(texts(&store), vec!["B", "C", "A"]);

        let slots = MemSlots::new();
        let mut store = seeded(&slots, &[("A", false), ("B", false), ("C", false)]);
        assert!(store.reorder(2, 0).unwrap());
        assert_eq!(texts(&store), vec!["C", "A", "B"]);
    }

    #[test]
    fn reorder_out_of_bounds_or_equal_is_noop() {
        let slots = MemSlots::new();
        let mut store = seeded(&slots, &[("A", false), ("B", false)]);
        let writes = slots.write_count();

        assert!(!store.reorder(1, 1).unwrap());
        assert!(!store.reorder(0, 2).unwrap());
        assert!(!store.reorder(5, 0).unwrap());
        assert_eq!(texts(&store), vec!["A", "B"]);
        assert_eq!(slots.write_count(), writes);
    }

    #[test]
    fn every_mutation_overwrites_slot_with_full_list() {
        let slots = MemSlots::new();
        let mut store = seeded(&slots, &[("A", false), ("B", true)]);
        store.reorder(1, 0).unwrap();

        let raw = slots.raw(DEFAULT_SLOT).unwrap();
        let persisted: Vec<Task> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, store.snapshot());
    }

    #[test]
    fn persist_then_reload_reproduces_sequence() {
        let slots = MemSlots::new();
        let original = {
            let mut store = seeded(&slots, &[("A", false), ("B", true), ("C", false)]);
            store.reorder(0, 2).unwrap();
            store.snapshot().to_vec()
        };

        let reloaded = store_with(&slots);
        assert_eq!(reloaded.snapshot(), original.as_slice());
    }

    #[test]
    fn reload_keeps_new_ids_above_loaded_ones() {
        let slots = MemSlots::with_value(
            DEFAULT_SLOT,
            r#"[{"id":99999999999999,"text":"future","completed":false}]"#,
        );
        let mut store = store_with(&slots);
        let id = store.add("next").unwrap().unwrap();
        assert_eq!(id.get(), 100_000_000_000_000);
    }

    #[test]
    fn corrupt_slot_degrades_to_empty() {
        let slots = MemSlots::with_value(DEFAULT_SLOT, "{not json");
        let store = store_with(&slots);
        assert!(store.is_empty());

        let slots = MemSlots::with_value(DEFAULT_SLOT, r#"{"id":1}"#);
        let store = store_with(&slots);
        assert!(store.is_empty());

        let slots = MemSlots::with_value(DEFAULT_SLOT, "null");
        let store = store_with(&slots);
        assert!(store.is_empty());
    }

    #[test]
    fn duplicate_ids_in_snapshot_keep_first() {
        let slots = MemSlots::with_value(
            DEFAULT_SLOT,
            r#"[{"id":1,"text":"first","completed":false},{"id":1,"text":"dup","completed":true},{"id":2,"text":"second","completed":false}]"#,
        );
        let store = store_with(&slots);
        assert_eq!(texts(&store), vec!["first", "second"]);
    }

    #[test]
    fn write_failures_propagate() {
        let slots = MemSlots::new();
        let mut store = store_with(&slots);
        slots.set_simulate_write_error(true);
        assert!(store.add("A").is_err());
    }

    #[test]
    fn failed_writes_leave_list_matching_slot() {
        let slots = MemSlots::new();
        let mut store = seeded(&slots, &[("A", true), ("B", false), ("C", false)]);
        let saved = store.snapshot().to_vec();
        let b = saved[1].id;
        slots.set_simulate_write_error(true);

        assert!(store.add("D").is_err());
        assert!(store.toggle(b).is_err());
        assert!(store.remove(b).is_err());
        assert!(store.clear_completed().is_err());
        assert!(store.reorder(0, 2).is_err());
        assert_eq!(store.snapshot(), saved.as_slice());

        let persisted: Vec<Task> = serde_json::from_str(&slots.raw(DEFAULT_SLOT).unwrap()).unwrap();
        assert_eq!(persisted, saved);
    }

    #[test]
    fn unreadable_slot_is_never_overwritten() {
        let saved = r#"[{"id":1,"text":"keep me","completed":false}]"#;
        let slots = MemSlots::with_value(DEFAULT_SLOT, saved);
        slots.set_simulate_read_error(true);
        let mut store = store_with(&slots);
        slots.set_simulate_read_error(false);

        assert!(store.is_empty());
        assert!(store.load_failed());
        let err = store.add("new").expect_err("write refused");
        assert!(matches!(err, Error::SlotUnreadable(_)));
        assert!(store.is_empty());
        assert_eq!(slots.raw(DEFAULT_SLOT).as_deref(), Some(saved));
        assert_eq!(slots.write_count(), 0);

        store.initialize();
        assert!(!store.load_failed());
        assert_eq!(texts(&store), vec!["keep me"]);
        store.add("new").unwrap();
        assert_eq!(texts(&store), vec!["keep me", "new"]);
    }
}
