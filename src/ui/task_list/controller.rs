//! Gesture handling
//!
//! The controller owns the store, the current filter and the drag slot. Each
//! gesture runs to completion: store mutation (which persists), then a full
//! re-render of the surface.

use crate::error::Result;
use crate::storage::SlotBackend;
use crate::store::TaskStore;
use crate::task::{Filter, TaskId};

use super::surface::Surface;
use super::view;

/// A user gesture, independent of the input device that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Add the input field's text as a task
    Submit,
    Toggle(TaskId),
    Delete(TaskId),
    ClearCompleted,
    SelectFilter(Filter),
    DragStart(TaskId),
    DragOver(TaskId),
    Drop(TaskId),
    DragEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing happened
    Ignored,
    /// The surface was rebuilt
    Rendered,
    DragStarted,
    /// A drag is in progress and the hovered row accepts the drop
    DropAllowed,
    DragEnded,
}

#[derive(Debug)]
pub struct Controller<S> {
    store: TaskStore<S>,
    filter: Filter,
    drag_source: Option<TaskId>,
}

impl<S: SlotBackend> Controller<S> {
    pub fn new(store: TaskStore<S>) -> Self {
        Self {
            store,
            filter: Filter::All,
            drag_source: None,
        }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Row currently being dragged
    pub fn drag_source(&self) -> Option<TaskId> {
        self.drag_source
    }

    /// Rebuild the whole surface from current state
    pub fn refresh(&self, surface: &mut impl Surface) {
        view::render(self.store.snapshot(), self.filter, surface);
        view::update_count(self.store.snapshot(), surface);
        surface.set_active_filter(self.filter);
    }

    pub fn handle(&mut self, gesture: Gesture, surface: &mut impl Surface) -> Result<Outcome> {
        match gesture {
            Gesture::Submit => {
                let text = surface.input_text();
                surface.clear_input();
                self.store.add(&text)?;
                self.refresh(surface);
                Ok(Outcome::Rendered)
            }
            Gesture::Toggle(id) => {
                self.store.toggle(id)?;
                self.refresh(surface);
                Ok(Outcome::Rendered)
            }
            Gesture::Delete(id) => {
                self.store.remove(id)?;
                self.refresh(surface);
                Ok(Outcome::Rendered)
            }
            Gesture::ClearCompleted => {
                self.store.clear_completed()?;
                self.refresh(surface);
                Ok(Outcome::Rendered)
            }
            Gesture::SelectFilter(filter) => {
                tracing::debug!(%filter, "filter selected");
                self.filter = filter;
                self.refresh(surface);
                Ok(Outcome::Rendered)
            }
            Gesture::DragStart(id) => {
                if let Some(previous) = self.drag_source.replace(id) {
                    surface.set_dimmed(previous, false);
                }
                surface.set_dimmed(id, true);
                Ok(Outcome::DragStarted)
            }
            Gesture::DragOver(_) => {
                if self.drag_source.is_some() {
                    Ok(Outcome::DropAllowed)
                } else {
                    Ok(Outcome::Ignored)
                }
            }
            Gesture::Drop(target) => self.drop_on(target, surface),
            Gesture::DragEnd => {
                let Some(source) = self.drag_source.take() else {
                    return Ok(Outcome::Ignored);
                };
                surface.set_dimmed(source, false);
                Ok(Outcome::DragEnded)
            }
        }
    }

    /// Positions come from the rendered (possibly filtered) list and are
    /// handed to the store as-is.
    fn drop_on(&mut self, target: TaskId, surface: &mut impl Surface) -> Result<Outcome> {
        let Some(source) = self.drag_source else {
            return Ok(Outcome::Ignored);
        };
        if source == target {
            return Ok(Outcome::Ignored);
        }
        let (Some(from), Some(to)) = (surface.row_position(source), surface.row_position(target))
        else {
            return Ok(Outcome::Ignored);
        };

        tracing::debug!(%source, %target, from, to, filter = %self.filter, "drop");
        self.store.reorder(from, to)?;
        self.refresh(surface);
        Ok(Outcome::Rendered)
    }
}
