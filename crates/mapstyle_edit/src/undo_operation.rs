//! Undo operations for layer styling
//!
//! `StyleCommand` records one style edit as a pair of snapshots. Rapid
//! edits of the same layer (dragging a slider, typing a value) are folded
//! into a single command when they arrive within the merge window.
//!
//! `StyleUndoOp` is the enum stored in a layer's history. Besides style
//! edits it covers the style manager operations (add, remove and switch
//! named styles).

use chrono::{DateTime, Duration, Utc};
use mapstyle_engine::{Layer, LayerId, Result, StyleSnapshot, StyleTarget};

/// Default time in which consecutive style edits collapse into one undo step
pub const DEFAULT_MERGE_WINDOW_MS: u64 = 500;

/// Type of operation, used to decide whether two history entries may merge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleOperationType {
    StyleChange,
    AddNamedStyle,
    RemoveNamedStyle,
    SwitchNamedStyle,
}

/// One undoable style edit
#[derive(Clone, Debug)]
pub struct StyleCommand {
    layer: LayerId,
    text: String,
    after: StyleSnapshot,
    before: StyleSnapshot,
    timestamp: DateTime<Utc>,
}

impl StyleCommand {
    /// Create a command for an edit that has just been applied to `layer`.
    ///
    /// `after` is the style now on the layer, `before` the one it replaced.
    pub fn new(layer: LayerId, text: impl Into<String>, after: StyleSnapshot, before: StyleSnapshot) -> Self {
        Self::with_timestamp(layer, text, after, before, Utc::now())
    }

    pub fn with_timestamp(layer: LayerId, text: impl Into<String>, after: StyleSnapshot, before: StyleSnapshot, timestamp: DateTime<Utc>) -> Self {
        Self {
            layer,
            text: text.into(),
            after,
            before,
            timestamp,
        }
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn before(&self) -> &StyleSnapshot {
        &self.before
    }

    pub fn after(&self) -> &StyleSnapshot {
        &self.after
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Put the `before` style back on the target and repaint it
    pub fn undo(&self, target: &mut dyn StyleTarget) {
        self.restore(target, &self.before, "undo");
    }

    /// Put the `after` style back on the target and repaint it
    pub fn redo(&self, target: &mut dyn StyleTarget) {
        self.restore(target, &self.after, "redo");
    }

    // A failed read is already recorded by the target; the repaint happens
    // either way so the display matches whatever style the layer ended up with.
    fn restore(&self, target: &mut dyn StyleTarget, snapshot: &StyleSnapshot, action: &str) {
        if target.layer_id() != self.layer {
            log::error!("{} of '{}': command belongs to {}, not {}", action, self.text, self.layer, target.layer_id());
            return;
        }
        if let Err(err) = target.read_style(snapshot) {
            log::warn!("{} of '{}' on {}: {}", action, self.text, self.layer, err);
        }
        target.trigger_repaint();
    }

    /// Fold `other` into this command if both edit the same layer within
    /// `merge_window`.
    ///
    /// On success this command keeps its `before` snapshot, takes over the
    /// `after` snapshot and timestamp of `other` and `other` should be
    /// discarded by the caller.
    pub fn merge_with(&mut self, other: &StyleCommand, merge_window: Duration) -> bool {
        if other.layer != self.layer {
            return false;
        }
        if other.timestamp - self.timestamp > merge_window {
            return false;
        }
        self.after = other.after.clone();
        self.timestamp = other.timestamp;
        true
    }
}

/// History entry of a layer
#[derive(Clone, Debug)]
pub enum StyleUndoOp {
    /// Style edit through one of the style panels
    StyleChange(StyleCommand),

    /// Named style added to the style manager
    AddNamedStyle { layer: LayerId, name: String, snapshot: StyleSnapshot },

    /// Named style removed from the style manager
    RemoveNamedStyle { layer: LayerId, name: String, snapshot: StyleSnapshot },

    /// Current style switched to another named style
    SwitchNamedStyle {
        layer: LayerId,
        old_name: String,
        new_name: String,
        old_style: StyleSnapshot,
        new_style: StyleSnapshot,
    },
}

impl StyleUndoOp {
    /// Get a description of this operation for display
    pub fn get_description(&self) -> String {
        match self {
            StyleUndoOp::StyleChange(cmd) => cmd.text().to_string(),
            StyleUndoOp::AddNamedStyle { name, .. } => format!("Add Style '{name}'"),
            StyleUndoOp::RemoveNamedStyle { name, .. } => format!("Remove Style '{name}'"),
            StyleUndoOp::SwitchNamedStyle { new_name, .. } => format!("Switch Style to '{new_name}'"),
        }
    }

    pub fn get_operation_type(&self) -> StyleOperationType {
        match self {
            StyleUndoOp::StyleChange(_) => StyleOperationType::StyleChange,
            StyleUndoOp::AddNamedStyle { .. } => StyleOperationType::AddNamedStyle,
            StyleUndoOp::RemoveNamedStyle { .. } => StyleOperationType::RemoveNamedStyle,
            StyleUndoOp::SwitchNamedStyle { .. } => StyleOperationType::SwitchNamedStyle,
        }
    }

    /// Layer this operation applies to
    pub fn layer(&self) -> LayerId {
        match self {
            StyleUndoOp::StyleChange(cmd) => cmd.layer(),
            StyleUndoOp::AddNamedStyle { layer, .. } | StyleUndoOp::RemoveNamedStyle { layer, .. } | StyleUndoOp::SwitchNamedStyle { layer, .. } => *layer,
        }
    }

    /// Whether this operation changes the drawn style (needs a repaint)
    pub fn changes_style(&self) -> bool {
        matches!(self, StyleUndoOp::StyleChange(_) | StyleUndoOp::SwitchNamedStyle { .. })
    }

    /// Try to absorb `other`. Only style changes merge, and only with
    /// another style change.
    pub fn merge_with(&mut self, other: &StyleUndoOp, merge_window: Duration) -> bool {
        if self.get_operation_type() != other.get_operation_type() {
            return false;
        }
        match (self, other) {
            (StyleUndoOp::StyleChange(cmd), StyleUndoOp::StyleChange(other_cmd)) => cmd.merge_with(other_cmd, merge_window),
            _ => false,
        }
    }

    /// Undo this operation
    ///
    /// # Errors
    ///
    /// Style changes never fail. Style manager operations fail if the
    /// layer's named styles no longer match the history.
    pub fn undo(&self, layer: &mut Layer) -> Result<()> {
        match self {
            StyleUndoOp::StyleChange(cmd) => {
                cmd.undo(layer);
                Ok(())
            }
            StyleUndoOp::AddNamedStyle { name, .. } => {
                layer.remove_named_style(name)?;
                Ok(())
            }
            StyleUndoOp::RemoveNamedStyle { name, snapshot, .. } => layer.add_named_style(name, snapshot.clone()),
            StyleUndoOp::SwitchNamedStyle {
                old_name,
                new_name,
                old_style,
                new_style,
                ..
            } => switch_style(layer, new_name, new_style, old_name, old_style),
        }
    }

    /// Redo this operation
    ///
    /// # Errors
    ///
    /// See [`StyleUndoOp::undo`].
    pub fn redo(&self, layer: &mut Layer) -> Result<()> {
        match self {
            StyleUndoOp::StyleChange(cmd) => {
                cmd.redo(layer);
                Ok(())
            }
            StyleUndoOp::AddNamedStyle { name, snapshot, .. } => layer.add_named_style(name, snapshot.clone()),
            StyleUndoOp::RemoveNamedStyle { name, .. } => {
                layer.remove_named_style(name)?;
                Ok(())
            }
            StyleUndoOp::SwitchNamedStyle {
                old_name,
                new_name,
                old_style,
                new_style,
                ..
            } => switch_style(layer, old_name, old_style, new_name, new_style),
        }
    }
}

// Loads the incoming style, then stores the outgoing one under its name.
// A failed read leaves the layer and its named styles untouched.
fn switch_style(layer: &mut Layer, leaving_name: &str, leaving_style: &StyleSnapshot, entering_name: &str, entering_style: &StyleSnapshot) -> Result<()> {
    layer.read_style(entering_style)?;
    layer.store_named_style(leaving_name, leaving_style.clone());
    layer.set_current_style_name(entering_name);
    layer.trigger_repaint();
    Ok(())
}
