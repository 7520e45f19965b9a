//! Linear snapshot history for undo/redo.
//!
//! Engines record the state they had *before* each drawing action. Undo swaps
//! the current state with the latest snapshot; redo swaps it back. Recording a
//! new action drops whatever could have been redone.

use std::collections::VecDeque;

/// Default number of undo steps kept per engine.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Snapshot-based undo/redo history.
#[derive(Debug, Clone)]
pub struct History<T> {
    /// States that can be restored by undo, oldest first.
    undo_stack: VecDeque<T>,
    /// States that can be restored by redo, most recent last.
    redo_stack: Vec<T>,
    /// Maximum undo depth; the oldest snapshot is dropped past it.
    limit: usize,
    /// Whether undone states are kept for redo.
    redo_enabled: bool,
}

impl<T> History<T> {
    /// Create a history with undo and redo.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
            redo_enabled: true,
        }
    }

    /// Create a history that only supports undo.
    #[must_use]
    pub fn undo_only(limit: usize) -> Self {
        Self {
            redo_enabled: false,
            ..Self::new(limit)
        }
    }

    /// Record the state as it was before an action.
    pub fn record(&mut self, before: T) {
        if self.undo_stack.len() == self.limit {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(before);
        self.redo_stack.clear();
    }

    /// Step back. `current` is replaced by the previous state.
    ///
    /// Returns `false` (and leaves `current` untouched) if there is nothing to undo.
    pub fn undo(&mut self, current: &mut T) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };
        let undone = std::mem::replace(current, previous);
        if self.redo_enabled {
            self.redo_stack.push(undone);
        }
        true
    }

    /// Step forward again. `current` is replaced by the undone state.
    ///
    /// Returns `false` (and leaves `current` untouched) if there is nothing to redo.
    pub fn redo(&mut self, current: &mut T) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let before = std::mem::replace(current, next);
        self.undo_stack.push_back(before);
        true
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps available.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Forget every snapshot.
    pub fn reset(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
