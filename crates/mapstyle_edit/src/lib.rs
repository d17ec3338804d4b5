//! Undo-aware layer styling
//!
//! Builds on `mapstyle_engine` with the editing side:
//! - `StyleCommand` / `StyleUndoOp` - undoable style edits with time based merging
//! - `StyleUndoStack` - per-layer history with undo limit and save point
//! - `StylePanel` - page panels implementing `Applyable`
//! - `StylingSession` - the styling dock model tying it together
//! - `StylingOptions` - persisted settings

mod events;
pub use events::*;

mod options;
pub use options::StylingOptions;

mod panels;
pub use panels::*;

mod session;
pub use session::StylingSession;

mod undo_operation;
pub use undo_operation::{StyleCommand, StyleOperationType, StyleUndoOp, DEFAULT_MERGE_WINDOW_MS};

mod undo_stack;
pub use undo_stack::{PushOutcome, StyleUndoStack, StyleUndoState};

// Re-export the model types used throughout the editing API
pub use mapstyle_engine::{
    Color, ErrorLog, Labeling, Layer, LayerId, LayerKind, LayerStyle, Project, RasterStyle, RendererKind, Result, StyleError, StyleSnapshot, StyleTarget,
    Symbology, TransparentPixel, DEFAULT_STYLE_NAME,
};
