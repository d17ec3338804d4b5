use thiserror::Error;

use crate::LayerId;

/// Errors raised by the style model and its editing layer
#[derive(Error, Debug)]
pub enum StyleError {
    // === Serialization Errors ===
    #[error("Failed to serialize style: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to read style document: {0}")]
    Deserialize(#[from] toml::de::Error),

    #[error("Style does not fit {layer}: {reason}")]
    IncompatibleStyle { layer: LayerId, reason: String },

    #[error("Invalid color value: {value}")]
    InvalidColor { value: String },

    // === Layer Errors ===
    #[error("Unknown layer: {0}")]
    UnknownLayer(LayerId),

    #[error("No layer selected")]
    NoCurrentLayer,

    #[error("Page '{page}' is not available for this layer")]
    PageUnavailable { page: String },

    // === Style Manager Errors ===
    #[error("A style named '{name}' already exists")]
    DuplicateStyleName { name: String },

    #[error("No style named '{name}'")]
    UnknownStyleName { name: String },

    #[error("Can't remove the current style '{name}'")]
    RemoveCurrentStyle { name: String },
}

/// Result type alias for mapstyle operations
pub type Result<T> = std::result::Result<T, StyleError>;

// === Convenience constructors ===
impl StyleError {
    /// Create an error for a style that can't be applied to a layer
    pub fn incompatible(layer: LayerId, reason: impl Into<String>) -> Self {
        Self::IncompatibleStyle { layer, reason: reason.into() }
    }

    pub fn unknown_style(name: impl Into<String>) -> Self {
        Self::UnknownStyleName { name: name.into() }
    }

    pub fn duplicate_style(name: impl Into<String>) -> Self {
        Self::DuplicateStyleName { name: name.into() }
    }
}
