//! Style model for map layers
//!
//! Provides the data side of layer styling:
//! - `LayerStyle` and its parts (symbology, labeling, raster rendering)
//! - `StyleSnapshot` - an immutable serialized style document
//! - `Layer` / `StyleTarget` - style read/write and repaint requests
//! - `Project` - the layer registry
//! - `ErrorLog` - error messages collected by style reads

mod error;
pub use error::*;

mod error_log;
pub use error_log::{ErrorLog, ErrorMessage, MessageFormat};

mod layer;
pub use layer::{Layer, LayerId, LayerKind, StyleTarget, DEFAULT_STYLE_NAME};

mod project;
pub use project::Project;

mod snapshot;
pub use snapshot::StyleSnapshot;

mod style;
pub use style::{Color, LayerStyle, Labeling, RasterStyle, RendererKind, Symbology, TransparentPixel};
