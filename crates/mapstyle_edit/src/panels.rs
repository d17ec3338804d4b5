//! Style pages and their edit panels
//!
//! Each page of the styling dock has a panel that buffers pending edits.
//! `Applyable::apply` writes them into a layer style and reports whether
//! anything changed; the session turns that into an undo entry.

use std::fmt;

use mapstyle_engine::{LayerKind, LayerStyle, Labeling, RasterStyle, Symbology, TransparentPixel};

pub const STYLE_CHANGE_TEXT: &str = "Style Change";
pub const LABEL_CHANGE_TEXT: &str = "Label Change";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StylePage {
    Symbology,
    Labels,
    Transparency,
    Histogram,
    History,
}

const VECTOR_PAGES: [StylePage; 3] = [StylePage::Symbology, StylePage::Labels, StylePage::History];
const RASTER_PAGES: [StylePage; 4] = [StylePage::Symbology, StylePage::Transparency, StylePage::Histogram, StylePage::History];

impl StylePage {
    /// Pages offered for a layer kind, in display order. The history page
    /// is always last.
    pub fn pages_for(kind: LayerKind) -> &'static [StylePage] {
        match kind {
            LayerKind::Vector => &VECTOR_PAGES,
            LayerKind::Raster => &RASTER_PAGES,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StylePage::Symbology => "Symbology",
            StylePage::Labels => "Labels",
            StylePage::Transparency => "Transparency",
            StylePage::Histogram => "Histogram",
            StylePage::History => "History",
        }
    }
}

impl fmt::Display for StylePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// An edit panel that can push its pending state into a style
pub trait Applyable {
    /// Write the pending edits into `style`. Returns true if the style changed.
    fn apply(&mut self, style: &mut LayerStyle) -> bool;

    /// Undo text for an apply that produced `style`
    fn undo_text(&self, style: &LayerStyle) -> String;

    /// Reload the pending state from `style`, discarding unapplied edits
    fn refresh(&mut self, style: &LayerStyle);
}

#[derive(Clone, Debug, PartialEq)]
pub struct SymbologyPanel {
    pub symbology: Symbology,
}

impl Applyable for SymbologyPanel {
    fn apply(&mut self, style: &mut LayerStyle) -> bool {
        if style.symbology == self.symbology {
            return false;
        }
        style.symbology = self.symbology.clone();
        true
    }

    fn undo_text(&self, style: &LayerStyle) -> String {
        format!("{} - {}", STYLE_CHANGE_TEXT, style.symbology.renderer.visible_name())
    }

    fn refresh(&mut self, style: &LayerStyle) {
        self.symbology = style.symbology.clone();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelingPanel {
    /// None = labels off
    pub labeling: Option<Labeling>,
}

impl Applyable for LabelingPanel {
    fn apply(&mut self, style: &mut LayerStyle) -> bool {
        if style.labeling == self.labeling {
            return false;
        }
        style.labeling = self.labeling.clone();
        true
    }

    fn undo_text(&self, _style: &LayerStyle) -> String {
        LABEL_CHANGE_TEXT.to_string()
    }

    fn refresh(&mut self, style: &LayerStyle) {
        self.labeling = style.labeling.clone();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransparencyPanel {
    pub opacity: f32,
    pub no_data_transparent: bool,
    pub transparent_pixels: Vec<TransparentPixel>,
}

impl TransparencyPanel {
    fn from_raster(raster: &RasterStyle) -> Self {
        Self {
            opacity: raster.opacity,
            no_data_transparent: raster.no_data_transparent,
            transparent_pixels: raster.transparent_pixels.clone(),
        }
    }
}

impl Applyable for TransparencyPanel {
    fn apply(&mut self, style: &mut LayerStyle) -> bool {
        let raster = style.raster.get_or_insert_with(RasterStyle::default);
        if raster.opacity == self.opacity && raster.no_data_transparent == self.no_data_transparent && raster.transparent_pixels == self.transparent_pixels {
            return false;
        }
        raster.opacity = self.opacity;
        raster.no_data_transparent = self.no_data_transparent;
        raster.transparent_pixels = self.transparent_pixels.clone();
        true
    }

    fn undo_text(&self, _style: &LayerStyle) -> String {
        STYLE_CHANGE_TEXT.to_string()
    }

    fn refresh(&mut self, style: &LayerStyle) {
        *self = Self::from_raster(&style.raster.clone().unwrap_or_default());
    }
}

/// Contrast range picked on the histogram
#[derive(Clone, Debug, PartialEq)]
pub struct HistogramPanel {
    pub min: f64,
    pub max: f64,
}

impl Applyable for HistogramPanel {
    fn apply(&mut self, style: &mut LayerStyle) -> bool {
        let raster = style.raster.get_or_insert_with(RasterStyle::default);
        if raster.min == self.min && raster.max == self.max {
            return false;
        }
        raster.min = self.min;
        raster.max = self.max;
        true
    }

    fn undo_text(&self, _style: &LayerStyle) -> String {
        STYLE_CHANGE_TEXT.to_string()
    }

    fn refresh(&mut self, style: &LayerStyle) {
        let raster = style.raster.clone().unwrap_or_default();
        self.min = raster.min;
        self.max = raster.max;
    }
}

/// The panel shown for the current page
#[derive(Clone, Debug, PartialEq)]
pub enum StylePanel {
    Symbology(SymbologyPanel),
    Labeling(LabelingPanel),
    Transparency(TransparencyPanel),
    Histogram(HistogramPanel),
    /// Undo history view, has nothing to apply
    History,
}

impl StylePanel {
    pub fn for_page(page: StylePage, style: &LayerStyle) -> Self {
        let raster = style.raster.clone().unwrap_or_default();
        match page {
            StylePage::Symbology => StylePanel::Symbology(SymbologyPanel {
                symbology: style.symbology.clone(),
            }),
            StylePage::Labels => StylePanel::Labeling(LabelingPanel {
                labeling: style.labeling.clone(),
            }),
            StylePage::Transparency => StylePanel::Transparency(TransparencyPanel::from_raster(&raster)),
            StylePage::Histogram => StylePanel::Histogram(HistogramPanel { min: raster.min, max: raster.max }),
            StylePage::History => StylePanel::History,
        }
    }

    pub fn page(&self) -> StylePage {
        match self {
            StylePanel::Symbology(_) => StylePage::Symbology,
            StylePanel::Labeling(_) => StylePage::Labels,
            StylePanel::Transparency(_) => StylePage::Transparency,
            StylePanel::Histogram(_) => StylePage::Histogram,
            StylePanel::History => StylePage::History,
        }
    }
}

impl Applyable for StylePanel {
    fn apply(&mut self, style: &mut LayerStyle) -> bool {
        match self {
            StylePanel::Symbology(panel) => panel.apply(style),
            StylePanel::Labeling(panel) => panel.apply(style),
            StylePanel::Transparency(panel) => panel.apply(style),
            StylePanel::Histogram(panel) => panel.apply(style),
            StylePanel::History => false,
        }
    }

    fn undo_text(&self, style: &LayerStyle) -> String {
        match self {
            StylePanel::Symbology(panel) => panel.undo_text(style),
            StylePanel::Labeling(panel) => panel.undo_text(style),
            StylePanel::Transparency(panel) => panel.undo_text(style),
            StylePanel::Histogram(panel) => panel.undo_text(style),
            StylePanel::History => STYLE_CHANGE_TEXT.to_string(),
        }
    }

    fn refresh(&mut self, style: &LayerStyle) {
        match self {
            StylePanel::Symbology(panel) => panel.refresh(style),
            StylePanel::Labeling(panel) => panel.refresh(style),
            StylePanel::Transparency(panel) => panel.refresh(style),
            StylePanel::Histogram(panel) => panel.refresh(style),
            StylePanel::History => {}
        }
    }
}
