//! Serialized style snapshots
//!
//! A snapshot is the TOML document of a `LayerStyle` taken at one point in
//! time. Once captured it never changes; two snapshots are equal when their
//! documents are equal.

use std::fmt;
use std::sync::Arc;

use crate::{LayerStyle, Result};

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StyleSnapshot {
    document: Arc<str>,
}

impl StyleSnapshot {
    /// Serialize a style into a new snapshot
    ///
    /// # Errors
    ///
    /// Returns `StyleError::Serialize` if the style can't be written as TOML.
    pub fn capture(style: &LayerStyle) -> Result<Self> {
        let document = toml::to_string(style)?;
        Ok(Self::from_document(document))
    }

    /// Wrap an already serialized style document.
    ///
    /// The text is not validated; reading it back may fail.
    pub fn from_document(document: impl Into<String>) -> Self {
        Self {
            document: Arc::from(document.into()),
        }
    }

    /// Parse the snapshot back into a style
    ///
    /// # Errors
    ///
    /// Returns `StyleError::Deserialize` if the document is malformed.
    pub fn restore(&self) -> Result<LayerStyle> {
        Ok(toml::from_str(&self.document)?)
    }

    pub fn as_str(&self) -> &str {
        &self.document
    }

    pub fn len(&self) -> usize {
        self.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }
}

impl fmt::Debug for StyleSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleSnapshot").field("len", &self.document.len()).finish()
    }
}

impl fmt::Display for StyleSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.document)
    }
}
