//! Styling session
//!
//! The model behind the layer styling dock. It tracks the layer being
//! styled, the active page and its panel, and turns applied panel edits
//! into entries of the layer's undo history:
//!
//! - `set_layer()` picks the layer and captures its style as the "last style"
//! - `apply()` writes the panel into the layer and pushes a `StyleCommand`
//!   from the last style to the new one (merging rapid edits)
//! - `undo()` / `redo()` walk the current layer's history
//! - `request_auto_apply()` / `poll_auto_apply()` implement live apply

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use mapstyle_engine::{Layer, LayerId, LayerKind, Project, Result, StyleError, StyleSnapshot, StyleTarget};
use tokio::sync::mpsc;

use crate::{
    Applyable, PushOutcome, StyleCommand, StylePage, StylePanel, StyleUndoOp, StyleUndoStack, StyleUndoState, StylingEvent, StylingOptions,
    EVENT_CHANNEL_SIZE,
};

pub struct StylingSession {
    project: Project,
    options: StylingOptions,
    undo_stacks: HashMap<LayerId, StyleUndoStack>,

    current_layer: Option<LayerId>,
    /// Kind of the current layer; the page is kept when the next layer has the same kind
    current_kind: Option<LayerKind>,
    page_index: usize,
    panel: Option<StylePanel>,
    /// Style of the current layer as of the last apply/undo/redo
    last_style: Option<StyleSnapshot>,

    auto_apply_at: Option<Instant>,
    block_auto_apply: bool,

    event_tx: mpsc::Sender<StylingEvent>,
}

impl StylingSession {
    pub fn new(project: Project, options: StylingOptions) -> (Self, mpsc::Receiver<StylingEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
        let session = Self {
            project,
            options,
            undo_stacks: HashMap::new(),
            current_layer: None,
            current_kind: None,
            page_index: 0,
            panel: None,
            last_style: None,
            auto_apply_at: None,
            block_auto_apply: false,
            event_tx,
        };
        (session, event_rx)
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    pub fn options(&self) -> &StylingOptions {
        &self.options
    }

    /// Replace the options; a changed undo limit applies to existing histories.
    pub fn set_options(&mut self, options: StylingOptions) {
        if options.undo_limit != self.options.undo_limit {
            for stack in self.undo_stacks.values_mut() {
                stack.set_undo_limit(options.undo_limit);
            }
        }
        if !options.live_apply {
            self.auto_apply_at = None;
        }
        self.options = options;
    }

    pub fn set_live_apply(&mut self, live_apply: bool) {
        self.options.live_apply = live_apply;
        if !live_apply {
            self.auto_apply_at = None;
        }
    }

    pub fn set_block_auto_apply(&mut self, block: bool) {
        self.block_auto_apply = block;
    }

    pub fn current_layer(&self) -> Option<LayerId> {
        self.current_layer
    }

    pub fn current_page(&self) -> Option<StylePage> {
        self.current_kind.and_then(|kind| StylePage::pages_for(kind).get(self.page_index).copied())
    }

    pub fn panel(&self) -> Option<&StylePanel> {
        self.panel.as_ref()
    }

    /// Edit the pending state of the current panel. Nothing reaches the
    /// layer before `apply()`.
    pub fn panel_mut(&mut self) -> Option<&mut StylePanel> {
        self.panel.as_mut()
    }

    pub fn last_style(&self) -> Option<&StyleSnapshot> {
        self.last_style.as_ref()
    }

    pub fn undo_stack(&self, layer: LayerId) -> Option<&StyleUndoStack> {
        self.undo_stacks.get(&layer)
    }

    /// Select the layer to style, or none.
    ///
    /// # Errors
    ///
    /// Fails with `StyleError::UnknownLayer` if the project has no such layer.
    pub fn set_layer(&mut self, layer: Option<LayerId>) -> Result<()> {
        if layer == self.current_layer {
            return Ok(());
        }

        let Some(id) = layer else {
            self.clear_current_layer();
            return Ok(());
        };

        let layer = self.project.layer(id).ok_or(StyleError::UnknownLayer(id))?;
        let kind = layer.kind();
        let page_index = if self.current_kind == Some(kind) { self.page_index } else { 0 };
        let pages = StylePage::pages_for(kind);
        let page_index = page_index.min(pages.len() - 1);
        let panel = StylePanel::for_page(pages[page_index], layer.style());
        let snapshot = layer.write_style()?;

        self.auto_apply_at = None;
        self.current_layer = Some(id);
        self.current_kind = Some(kind);
        self.page_index = page_index;
        self.panel = Some(panel);
        self.last_style = Some(snapshot);
        log::debug!("styling {} ({}) on page {}", layer.name(), id, pages[page_index]);

        self.emit(StylingEvent::CurrentLayerChanged { layer: Some(id) });
        Ok(())
    }

    /// Switch the current layer to another page. Unapplied edits of the
    /// previous panel are dropped.
    ///
    /// # Errors
    ///
    /// Fails if no layer is selected or the page isn't offered for its kind.
    pub fn set_page(&mut self, page: StylePage) -> Result<()> {
        let layer = self.current_layer_ref()?;
        let index = StylePage::pages_for(layer.kind())
            .iter()
            .position(|p| *p == page)
            .ok_or_else(|| StyleError::PageUnavailable { page: page.title().to_string() })?;
        let panel = StylePanel::for_page(page, layer.style());
        self.page_index = index;
        self.panel = Some(panel);
        Ok(())
    }

    /// Apply the current panel to the current layer and record the change.
    ///
    /// Returns whether the panel changed the style.
    ///
    /// # Errors
    ///
    /// Fails if the layer is gone or its style can't be serialized.
    pub fn apply(&mut self) -> Result<bool> {
        self.apply_at(Utc::now())
    }

    /// Same as `apply()` with an explicit time for the undo entry
    ///
    /// # Errors
    ///
    /// See [`StylingSession::apply`].
    pub fn apply_at(&mut self, timestamp: DateTime<Utc>) -> Result<bool> {
        let Some(id) = self.current_layer else {
            return Ok(false);
        };
        self.auto_apply_at = None;

        let layer = self.project.layer_mut(id).ok_or(StyleError::UnknownLayer(id))?;
        let (changed, text) = match self.panel.as_mut() {
            Some(panel) => {
                let changed = panel.apply(layer.style_mut());
                (changed, panel.undo_text(layer.style()))
            }
            None => (false, crate::STYLE_CHANGE_TEXT.to_string()),
        };
        let after = layer.write_style()?;
        if changed {
            layer.trigger_repaint();
        }

        if let Some(before) = self.last_style.replace(after.clone()) {
            if before != after {
                let op = StyleUndoOp::StyleChange(StyleCommand::with_timestamp(id, text, after, before, timestamp));
                let merge_window = self.options.merge_window();
                if self.stack_mut(id).push(op, merge_window) == PushOutcome::Pushed {
                    log::debug!("pushed style change for {}", id);
                }
                self.emit_history(id);
            }
        }

        if changed {
            self.project.set_dirty(true);
            self.emit(StylingEvent::StyleChanged { layer: id });
        }
        Ok(changed)
    }

    /// Schedule an apply after the configured delay. Restarts a pending
    /// schedule. Does nothing when live apply is off or blocked.
    pub fn request_auto_apply(&mut self, now: Instant) {
        if self.options.live_apply && !self.block_auto_apply && self.current_layer.is_some() {
            self.auto_apply_at = Some(now + self.options.auto_apply_delay());
        }
    }

    pub fn auto_apply_pending(&self) -> bool {
        self.auto_apply_at.is_some()
    }

    /// Run a scheduled apply once its time has come.
    ///
    /// Returns true if an apply ran.
    ///
    /// # Errors
    ///
    /// See [`StylingSession::apply`].
    pub fn poll_auto_apply(&mut self, now: Instant) -> Result<bool> {
        match self.auto_apply_at {
            Some(at) if now >= at => {
                self.auto_apply_at = None;
                self.apply()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Time left until a scheduled apply, for event loops that sleep
    pub fn time_until_auto_apply(&self, now: Instant) -> Option<Duration> {
        self.auto_apply_at.map(|at| at.saturating_duration_since(now))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Style manager
    // ─────────────────────────────────────────────────────────────────────

    /// Store the current style of the current layer under `name`
    ///
    /// # Errors
    ///
    /// Fails if no layer is selected or the name is taken.
    pub fn add_named_style(&mut self, name: &str) -> Result<()> {
        let layer = self.current_layer_ref()?;
        let op = StyleUndoOp::AddNamedStyle {
            layer: layer.id(),
            name: name.to_string(),
            snapshot: layer.write_style()?,
        };
        self.push_undo_action(op)
    }

    /// # Errors
    ///
    /// Fails if no layer is selected, the name is unknown or is the current style.
    pub fn remove_named_style(&mut self, name: &str) -> Result<()> {
        let layer = self.current_layer_ref()?;
        if layer.current_style_name() == name {
            return Err(StyleError::RemoveCurrentStyle { name: name.to_string() });
        }
        let snapshot = layer.named_style(name).cloned().ok_or_else(|| StyleError::unknown_style(name))?;
        let op = StyleUndoOp::RemoveNamedStyle {
            layer: layer.id(),
            name: name.to_string(),
            snapshot,
        };
        self.push_undo_action(op)
    }

    /// Make the named style current. The outgoing style is stored under
    /// its own name.
    ///
    /// # Errors
    ///
    /// Fails if no layer is selected, the name is unknown or its style
    /// can't be read.
    pub fn switch_named_style(&mut self, name: &str) -> Result<()> {
        let layer = self.current_layer_ref()?;
        if layer.current_style_name() == name {
            return Ok(());
        }
        let new_style = layer.named_style(name).cloned().ok_or_else(|| StyleError::unknown_style(name))?;
        let op = StyleUndoOp::SwitchNamedStyle {
            layer: layer.id(),
            old_name: layer.current_style_name().to_string(),
            new_name: name.to_string(),
            old_style: layer.write_style()?,
            new_style,
        };
        self.push_undo_action(op)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Layer lifetime and saving
    // ─────────────────────────────────────────────────────────────────────

    /// Remove a layer from the project together with its history
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        if self.current_layer == Some(id) {
            self.clear_current_layer();
        }
        self.undo_stacks.remove(&id);
        self.project.remove_layer(id)
    }

    /// Mark every history as saved and the project as clean
    pub fn mark_saved(&mut self) {
        for stack in self.undo_stacks.values_mut() {
            stack.mark_saved();
        }
        self.project.set_dirty(false);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    fn clear_current_layer(&mut self) {
        self.auto_apply_at = None;
        self.current_layer = None;
        self.current_kind = None;
        self.panel = None;
        self.last_style = None;
        self.emit(StylingEvent::CurrentLayerChanged { layer: None });
    }

    fn current_layer_ref(&self) -> Result<&Layer> {
        let id = self.current_layer.ok_or(StyleError::NoCurrentLayer)?;
        self.project.layer(id).ok_or(StyleError::UnknownLayer(id))
    }

    fn stack_mut(&mut self, id: LayerId) -> &mut StyleUndoStack {
        let undo_limit = self.options.undo_limit;
        self.undo_stacks.entry(id).or_insert_with(|| StyleUndoStack::with_limit(undo_limit))
    }

    /// Execute an operation (redo) and record it
    fn push_undo_action(&mut self, op: StyleUndoOp) -> Result<()> {
        let id = op.layer();
        let layer = self.project.layer_mut(id).ok_or(StyleError::UnknownLayer(id))?;
        op.redo(layer)?;
        let changes_style = op.changes_style();

        let merge_window = self.options.merge_window();
        self.stack_mut(id).push(op, merge_window);
        self.project.set_dirty(true);
        if changes_style {
            self.refresh_current(id);
            self.emit(StylingEvent::StyleChanged { layer: id });
        }
        self.emit_history(id);
        Ok(())
    }

    /// Reload panel and last style after the layer changed outside an apply
    fn refresh_current(&mut self, id: LayerId) {
        if self.current_layer != Some(id) {
            return;
        }
        let Some(layer) = self.project.layer(id) else {
            return;
        };
        if let Some(panel) = self.panel.as_mut() {
            panel.refresh(layer.style());
        }
        match layer.write_style() {
            Ok(snapshot) => self.last_style = Some(snapshot),
            Err(err) => log::warn!("Can't capture style of {}: {}", id, err),
        }
    }

    fn emit_history(&self, id: LayerId) {
        let (can_undo, can_redo) = self
            .undo_stacks
            .get(&id)
            .map_or((false, false), |stack| (stack.can_undo(), stack.can_redo()));
        self.emit(StylingEvent::HistoryChanged { layer: id, can_undo, can_redo });
    }

    fn emit(&self, event: StylingEvent) {
        // Use try_send to avoid blocking
        let _ = self.event_tx.try_send(event);
    }

    fn current_stack(&self) -> Option<&StyleUndoStack> {
        self.current_layer.and_then(|id| self.undo_stacks.get(&id))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// StyleUndoState Trait Implementation
// ═══════════════════════════════════════════════════════════════════════════

impl StyleUndoState for StylingSession {
    fn undo_description(&self) -> Option<String> {
        self.current_stack().and_then(StyleUndoStack::undo_description)
    }

    fn can_undo(&self) -> bool {
        self.current_stack().is_some_and(StyleUndoStack::can_undo)
    }

    fn undo(&mut self) -> Result<()> {
        let Some(id) = self.current_layer else {
            return Ok(());
        };
        let result = {
            let layer = self.project.layer_mut(id).ok_or(StyleError::UnknownLayer(id))?;
            let Some(stack) = self.undo_stacks.get_mut(&id) else {
                return Ok(());
            };
            let Some(op) = stack.pop_undo() else {
                return Ok(());
            };
            let result = op.undo(layer);
            stack.push_redo(op);
            result
        };

        self.project.set_dirty(true);
        self.refresh_current(id);
        self.emit_history(id);
        result
    }

    fn redo_description(&self) -> Option<String> {
        self.current_stack().and_then(StyleUndoStack::redo_description)
    }

    fn can_redo(&self) -> bool {
        self.current_stack().is_some_and(StyleUndoStack::can_redo)
    }

    fn redo(&mut self) -> Result<()> {
        let Some(id) = self.current_layer else {
            return Ok(());
        };
        let result = {
            let layer = self.project.layer_mut(id).ok_or(StyleError::UnknownLayer(id))?;
            let Some(stack) = self.undo_stacks.get_mut(&id) else {
                return Ok(());
            };
            let Some(op) = stack.pop_redo() else {
                return Ok(());
            };
            let result = op.redo(layer);
            stack.push_redone(op);
            result
        };

        self.project.set_dirty(true);
        self.refresh_current(id);
        self.emit_history(id);
        result
    }
}
