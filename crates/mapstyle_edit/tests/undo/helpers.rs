//! Shared test helpers for undo tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use mapstyle_edit::{Color, Layer, LayerId, LayerKind, LayerStyle, StyleCommand, StyleSnapshot, StyleUndoOp};

pub const WINDOW_MS: i64 = 500;

pub fn window() -> Duration {
    Duration::milliseconds(WINDOW_MS)
}

/// Fixed start time so merge distances are exact
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn at(ms: i64) -> DateTime<Utc> {
    t0() + Duration::milliseconds(ms)
}

pub fn snapshot(color: Color) -> StyleSnapshot {
    StyleSnapshot::capture(&LayerStyle::with_color(LayerKind::Vector, color)).unwrap()
}

pub fn vector_layer(color: Color) -> Layer {
    Layer::with_style("roads", LayerKind::Vector, LayerStyle::with_color(LayerKind::Vector, color))
}

pub fn command(layer: LayerId, before: Color, after: Color, ms: i64) -> StyleCommand {
    StyleCommand::with_timestamp(layer, "Style Change", snapshot(after), snapshot(before), at(ms))
}

pub fn change(layer: LayerId, before: Color, after: Color, ms: i64) -> StyleUndoOp {
    StyleUndoOp::StyleChange(command(layer, before, after, ms))
}
