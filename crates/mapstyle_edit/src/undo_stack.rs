//! Per-layer style history

use chrono::Duration;
use mapstyle_engine::Result;

use super::StyleUndoOp;

/// Trait for types that support undo/redo operations
pub trait StyleUndoState {
    /// Get description of the next undo operation
    fn undo_description(&self) -> Option<String>;

    /// Check if undo is available
    fn can_undo(&self) -> bool;

    /// Perform undo operation
    ///
    /// # Errors
    ///
    /// This function will return an error if the operation can't be reverted.
    fn undo(&mut self) -> Result<()>;

    /// Get description of the next redo operation
    fn redo_description(&self) -> Option<String>;

    /// Check if redo is available
    fn can_redo(&self) -> bool;

    /// Perform redo operation
    ///
    /// # Errors
    ///
    /// This function will return an error if the operation can't be reapplied.
    fn redo(&mut self) -> Result<()>;
}

/// What `StyleUndoStack::push` did with an operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// Added as a new history entry
    Pushed,
    /// Folded into the previous entry and dropped
    Merged,
}

/// Undo/redo history of one layer
#[derive(Debug)]
pub struct StyleUndoStack {
    undo_stack: Vec<StyleUndoOp>,
    redo_stack: Vec<StyleUndoOp>,
    /// Maximum number of undo entries, 0 = unlimited
    undo_limit: usize,
    /// Undo length at the last save, None if that state can't be reached anymore
    clean_index: Option<usize>,
}

impl Default for StyleUndoStack {
    fn default() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_limit: 0,
            clean_index: Some(0),
        }
    }
}

impl StyleUndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(undo_limit: usize) -> Self {
        Self {
            undo_limit,
            ..Default::default()
        }
    }

    /// Record an operation that has already been applied.
    ///
    /// The redo history is dropped. The operation is merged into the
    /// previous entry when that entry accepts it, unless the previous entry
    /// is the save point.
    pub fn push(&mut self, op: StyleUndoOp, merge_window: Duration) -> PushOutcome {
        self.drop_redo();

        if self.clean_index != Some(self.undo_stack.len()) {
            if let Some(top) = self.undo_stack.last_mut() {
                if top.merge_with(&op, merge_window) {
                    log::debug!("merged '{}' into previous entry", op.get_description());
                    return PushOutcome::Merged;
                }
            }
        }

        self.undo_stack.push(op);
        self.enforce_limit();
        PushOutcome::Pushed
    }

    /// Pop an operation from the undo stack
    pub fn pop_undo(&mut self) -> Option<StyleUndoOp> {
        self.undo_stack.pop()
    }

    /// Push an operation onto the redo stack
    pub fn push_redo(&mut self, op: StyleUndoOp) {
        self.redo_stack.push(op);
    }

    /// Pop an operation from the redo stack
    pub fn pop_redo(&mut self) -> Option<StyleUndoOp> {
        self.redo_stack.pop()
    }

    /// Put a redone operation back on the undo stack, keeping the redo history
    pub fn push_redone(&mut self, op: StyleUndoOp) {
        self.undo_stack.push(op);
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(StyleUndoOp::get_description)
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(StyleUndoOp::get_description)
    }

    /// Undo entries, oldest first
    pub fn undo_ops(&self) -> &[StyleUndoOp] {
        &self.undo_stack
    }

    /// Redo entries, next to redo last
    pub fn redo_ops(&self) -> &[StyleUndoOp] {
        &self.redo_stack
    }

    /// Clear both stacks. The empty history counts as saved.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.clean_index = Some(0);
    }

    pub fn undo_limit(&self) -> usize {
        self.undo_limit
    }

    /// Set the maximum number of undo entries; the oldest entries beyond
    /// the limit are evicted right away. 0 means unlimited.
    pub fn set_undo_limit(&mut self, undo_limit: usize) {
        self.undo_limit = undo_limit;
        self.enforce_limit();
    }

    /// Mark the current position as saved
    pub fn mark_saved(&mut self) {
        self.clean_index = Some(self.undo_stack.len());
    }

    /// True if the history is at the last saved position
    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    fn drop_redo(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }
        self.redo_stack.clear();
        if self.clean_index.is_some_and(|index| index > self.undo_stack.len()) {
            self.clean_index = None;
        }
    }

    fn enforce_limit(&mut self) {
        if self.undo_limit == 0 || self.undo_stack.len() <= self.undo_limit {
            return;
        }
        let evict = self.undo_stack.len() - self.undo_limit;
        self.undo_stack.drain(..evict);
        self.clean_index = self.clean_index.and_then(|index| index.checked_sub(evict));
    }
}
