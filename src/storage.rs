//! Durable key-value slots
//!
//! The task list lives in a single named slot. A slot backend only knows how
//! to read and overwrite whole values; what goes into a slot is the
//! [`crate::store::TaskStore`]'s business.
//!
//! # Directory Structure
//!
//! ```text
//! <data_dir>/
//!   todos.json        # The task list slot (JSON array)
//!   todos.json.lock   # Advisory lock guarding reads and writes
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};

/// Default slot name for the task list
pub const DEFAULT_SLOT: &str = "todos";

/// Extension used for slot files
const SLOT_EXTENSION: &str = "json";

/// Raw slot I/O.
///
/// `read` returns `Ok(None)` when the slot has never been written.
/// `write` must fully replace the previous value; readers never observe a
/// partial write.
pub trait SlotBackend {
    fn read(&self, slot: &str) -> Result<Option<String>>;

    fn write(&self, slot: &str, value: &str) -> Result<()>;
}

/// Check that a slot name is usable as a file stem
pub fn validate_slot_name(slot: &str) -> Result<()> {
    if slot.is_empty() {
        return Err(Error::InvalidArgument("slot name cannot be empty".to_string()));
    }
    if !slot
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(Error::InvalidArgument(format!(
            "slot name '{slot}' must only contain letters, digits, '-' or '_'"
        )));
    }
    Ok(())
}

/// Filesystem slots: one JSON file per slot inside a data directory
#[derive(Debug, Clone)]
pub struct FsSlots {
    dir: PathBuf,
    lock_timeout_ms: u64,
}

impl FsSlots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    /// How long reads and writes wait for another process's lock
    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    /// Data directory holding the slot files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path to the file backing a slot
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.{SLOT_EXTENSION}"))
    }
}

impl SlotBackend for FsSlots {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        validate_slot_name(slot)?;
        lock::read_locked_str(self.slot_path(slot), self.lock_timeout_ms)
    }

    fn write(&self, slot: &str, value: &str) -> Result<()> {
        validate_slot_name(slot)?;
        lock::write_atomic_locked(self.slot_path(slot), value.as_bytes(), self.lock_timeout_ms)
    }
}

/// In-memory slots for tests.
///
/// Uses `RefCell` since the store is single-threaded. Counts writes so tests
/// can assert that no-op mutations do not persist.
#[derive(Debug, Default)]
pub struct MemSlots {
    values: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
    simulate_read_error: Cell<bool>,
    simulate_write_error: Cell<bool>,
}

impl MemSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot with a raw value, bypassing the write counter
    pub fn with_value(slot: &str, value: &str) -> Self {
        let slots = Self::default();
        slots
            .values
            .borrow_mut()
            .insert(slot.to_string(), value.to_string());
        slots
    }

    /// Raw value currently held by a slot
    pub fn raw(&self, slot: &str) -> Option<String> {
        self.values.borrow().get(slot).cloned()
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Make every following read fail
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Make every following write fail
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }
}

impl SlotBackend for MemSlots {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        if self.simulate_read_error.get() {
            return Err(Error::OperationFailed("simulated read error".to_string()));
        }
        Ok(self.values.borrow().get(slot).cloned())
    }

    fn write(&self, slot: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(Error::OperationFailed("simulated write error".to_string()));
        }
        self.values
            .borrow_mut()
            .insert(slot.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl<T: SlotBackend + ?Sized> SlotBackend for &T {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        (**self).read(slot)
    }

    fn write(&self, slot: &str, value: &str) -> Result<()> {
        (**self).write(slot, value)
    }
}
