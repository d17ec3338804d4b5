//! Map layers and the style collaborator contract
//!
//! `StyleTarget` is everything an undo command needs from a layer: write the
//! current style to a snapshot, read a snapshot back and ask for a repaint.
//! `Layer` is the in-memory implementation used by the editor.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::{error_message, ErrorLog, LayerStyle, Result, StyleError, StyleSnapshot};

/// Name of the style every layer starts with
pub const DEFAULT_STYLE_NAME: &str = "default";

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Process unique layer identifier.
///
/// Commands refer to layers through this id and never own them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerId(u64);

impl LayerId {
    pub fn next() -> Self {
        Self(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Vector,
    Raster,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Vector => write!(f, "vector"),
            LayerKind::Raster => write!(f, "raster"),
        }
    }
}

/// Style serialization and repaint, as seen by undo commands
pub trait StyleTarget {
    fn layer_id(&self) -> LayerId;

    /// Serialize the current style.
    ///
    /// # Errors
    ///
    /// This function will return an error if the style can't be serialized.
    fn write_style(&self) -> Result<StyleSnapshot>;

    /// Replace the current style with the snapshot.
    ///
    /// On failure the current style stays as it was.
    ///
    /// # Errors
    ///
    /// This function will return an error if the snapshot is malformed or
    /// doesn't fit the target.
    fn read_style(&mut self, snapshot: &StyleSnapshot) -> Result<()>;

    /// Request a redraw, fire and forget
    fn trigger_repaint(&mut self);
}

pub struct Layer {
    id: LayerId,
    name: String,
    kind: LayerKind,
    style: LayerStyle,
    error: ErrorLog,
    repaint_count: u64,

    /// Stored styles other than the current one
    named_styles: BTreeMap<String, StyleSnapshot>,
    current_style_name: String,
}

impl Layer {
    pub fn new(name: impl Into<String>, kind: LayerKind) -> Self {
        Self::with_style(name, kind, LayerStyle::default_for(kind))
    }

    pub fn with_style(name: impl Into<String>, kind: LayerKind, style: LayerStyle) -> Self {
        Self {
            id: LayerId::next(),
            name: name.into(),
            kind,
            style,
            error: ErrorLog::new(),
            repaint_count: 0,
            named_styles: BTreeMap::new(),
            current_style_name: DEFAULT_STYLE_NAME.to_string(),
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn style(&self) -> &LayerStyle {
        &self.style
    }

    /// Direct access for edit panels. Changes made here are not recorded
    /// in any history.
    pub fn style_mut(&mut self) -> &mut LayerStyle {
        &mut self.style
    }

    /// Errors reported by style reads and writes
    pub fn error(&self) -> &ErrorLog {
        &self.error
    }

    /// Number of repaints requested so far
    pub fn repaint_count(&self) -> u64 {
        self.repaint_count
    }

    // ─────────────────────────────────────────────────────────────────────
    // Style manager
    // ─────────────────────────────────────────────────────────────────────

    pub fn current_style_name(&self) -> &str {
        &self.current_style_name
    }

    /// All style names, including the current one
    pub fn style_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.named_styles.keys().cloned().collect();
        if !self.named_styles.contains_key(&self.current_style_name) {
            names.push(self.current_style_name.clone());
            names.sort();
        }
        names
    }

    pub fn named_style(&self, name: &str) -> Option<&StyleSnapshot> {
        self.named_styles.get(name)
    }

    /// # Errors
    ///
    /// Fails if a style with this name already exists.
    pub fn add_named_style(&mut self, name: &str, snapshot: StyleSnapshot) -> Result<()> {
        if name == self.current_style_name || self.named_styles.contains_key(name) {
            return Err(StyleError::duplicate_style(name));
        }
        self.named_styles.insert(name.to_string(), snapshot);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails if the name is unknown or is the current style.
    pub fn remove_named_style(&mut self, name: &str) -> Result<StyleSnapshot> {
        if name == self.current_style_name {
            return Err(StyleError::RemoveCurrentStyle { name: name.to_string() });
        }
        self.named_styles.remove(name).ok_or_else(|| StyleError::unknown_style(name))
    }

    /// Make `name` the current style slot. A stored snapshot under that
    /// name is dropped, the caller has already loaded it.
    pub fn set_current_style_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.named_styles.remove(&name);
        self.current_style_name = name;
    }

    /// Store `snapshot` under `name` without checking for duplicates
    pub fn store_named_style(&mut self, name: &str, snapshot: StyleSnapshot) {
        self.named_styles.insert(name.to_string(), snapshot);
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("current_style_name", &self.current_style_name)
            .finish()
    }
}

impl StyleTarget for Layer {
    fn layer_id(&self) -> LayerId {
        self.id
    }

    fn write_style(&self) -> Result<StyleSnapshot> {
        StyleSnapshot::capture(&self.style)
    }

    fn read_style(&mut self, snapshot: &StyleSnapshot) -> Result<()> {
        let style = match snapshot.restore() {
            Ok(style) => style,
            Err(err) => {
                self.error.push(error_message!(err.to_string(), "Style"));
                return Err(err);
            }
        };
        if let Some(reason) = style.incompatibility(self.kind) {
            self.error.push(error_message!(reason.clone(), "Style"));
            return Err(StyleError::incompatible(self.id, reason));
        }
        self.style = style;
        Ok(())
    }

    fn trigger_repaint(&mut self) {
        self.repaint_count += 1;
        log::trace!("repaint requested for {} ({})", self.name, self.id);
    }
}
