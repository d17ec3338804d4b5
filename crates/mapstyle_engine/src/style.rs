//! Style model for map layers
//!
//! A `LayerStyle` bundles everything that decides how a layer is drawn:
//! - `Symbology` - renderer type, fill color, opacity and stroke
//! - `Labeling` - optional label settings (vector layers)
//! - `RasterStyle` - optional raster rendering parameters (raster layers)
//!
//! All types are plain data and serialize to TOML, which is the document
//! format used by `StyleSnapshot`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{LayerKind, StyleError};

/// RGBA color, serialized as `#rrggbb` or `#rrggbbaa`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional)
    ///
    /// # Errors
    ///
    /// Returns `StyleError::InvalidColor` if the text is not a hex color.
    pub fn from_hex(text: &str) -> crate::Result<Self> {
        let invalid = || StyleError::InvalidColor { value: text.to_string() };
        let hex = text.strip_prefix('#').unwrap_or(text);
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(invalid());
        }
        let component = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { component(6)? } else { 255 };
        Ok(Self::rgba(component(0)?, component(2)?, component(4)?, a))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = StyleError;

    fn try_from(value: String) -> crate::Result<Self> {
        Color::from_hex(&value)
    }
}

/// Renderer used to draw a layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    // vector renderers
    SingleSymbol,
    Categorized,
    Graduated,
    RuleBased,
    Heatmap,
    // raster renderers
    SingleBandGray,
    MultiBandColor,
    Paletted,
    SingleBandPseudoColor,
}

impl RendererKind {
    /// Name shown to the user, also used in undo descriptions
    pub fn visible_name(&self) -> &'static str {
        match self {
            RendererKind::SingleSymbol => "Single symbol",
            RendererKind::Categorized => "Categorized",
            RendererKind::Graduated => "Graduated",
            RendererKind::RuleBased => "Rule-based",
            RendererKind::Heatmap => "Heatmap",
            RendererKind::SingleBandGray => "Singleband gray",
            RendererKind::MultiBandColor => "Multiband color",
            RendererKind::Paletted => "Paletted/Unique values",
            RendererKind::SingleBandPseudoColor => "Singleband pseudocolor",
        }
    }

    pub fn is_raster(&self) -> bool {
        matches!(
            self,
            RendererKind::SingleBandGray | RendererKind::MultiBandColor | RendererKind::Paletted | RendererKind::SingleBandPseudoColor
        )
    }

    /// Check whether this renderer can draw a layer of the given kind
    pub fn supports(&self, kind: LayerKind) -> bool {
        match kind {
            LayerKind::Vector => !self.is_raster(),
            LayerKind::Raster => self.is_raster(),
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.visible_name())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Symbology {
    pub renderer: RendererKind,
    pub color: Color,
    /// 0.0 (transparent) ..= 1.0 (opaque)
    pub opacity: f32,
    pub stroke_width: f32,
}

impl Symbology {
    pub fn default_for(kind: LayerKind) -> Self {
        let renderer = match kind {
            LayerKind::Vector => RendererKind::SingleSymbol,
            LayerKind::Raster => RendererKind::SingleBandGray,
        };
        Self {
            renderer,
            color: Color::rgb(0x72, 0x9b, 0x6f),
            opacity: 1.0,
            stroke_width: 0.26,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Labeling {
    pub enabled: bool,
    /// Attribute field the label text is taken from
    pub field: String,
    pub font_size: f32,
    pub color: Color,
}

impl Default for Labeling {
    fn default() -> Self {
        Self {
            enabled: true,
            field: String::new(),
            font_size: 10.0,
            color: Color::BLACK,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransparentPixel {
    pub value: f64,
    pub percent_transparent: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RasterStyle {
    pub opacity: f32,
    pub no_data_transparent: bool,
    /// Contrast enhancement range
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub transparent_pixels: Vec<TransparentPixel>,
}

impl Default for RasterStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            no_data_transparent: true,
            min: 0.0,
            max: 255.0,
            transparent_pixels: Vec::new(),
        }
    }
}

/// Complete style of a layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub symbology: Symbology,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labeling: Option<Labeling>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raster: Option<RasterStyle>,
}

impl LayerStyle {
    pub fn default_for(kind: LayerKind) -> Self {
        Self {
            symbology: Symbology::default_for(kind),
            labeling: None,
            raster: match kind {
                LayerKind::Vector => None,
                LayerKind::Raster => Some(RasterStyle::default()),
            },
        }
    }

    /// Style with a single fill color, everything else default
    pub fn with_color(kind: LayerKind, color: Color) -> Self {
        let mut style = Self::default_for(kind);
        style.symbology.color = color;
        style
    }

    /// Check that this style can be applied to a layer of the given kind.
    ///
    /// Returns a description of the first mismatch.
    pub fn incompatibility(&self, kind: LayerKind) -> Option<String> {
        if !self.symbology.renderer.supports(kind) {
            return Some(format!("renderer '{}' can't draw a {} layer", self.symbology.renderer, kind));
        }
        match kind {
            LayerKind::Vector if self.raster.is_some() => Some("raster settings on a vector layer".to_string()),
            LayerKind::Raster if self.labeling.is_some() => Some("labeling on a raster layer".to_string()),
            _ => None,
        }
    }
}
