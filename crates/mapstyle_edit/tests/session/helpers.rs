//! Shared test helpers for session tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use mapstyle_edit::{
    Color, Layer, LayerId, LayerKind, LayerStyle, Project, StyleSnapshot, StylePanel, StylingEvent, StylingOptions, StylingSession,
};
use tokio::sync::mpsc;

pub fn at(ms: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::milliseconds(ms)
}

pub fn snapshot(color: Color) -> StyleSnapshot {
    StyleSnapshot::capture(&LayerStyle::with_color(LayerKind::Vector, color)).unwrap()
}

/// Session with one red vector layer selected
pub fn create_session() -> (StylingSession, LayerId, mpsc::Receiver<StylingEvent>) {
    create_session_with_options(StylingOptions::default())
}

pub fn create_session_with_options(options: StylingOptions) -> (StylingSession, LayerId, mpsc::Receiver<StylingEvent>) {
    let mut project = Project::new();
    let id = project.add_layer(Layer::with_style("roads", LayerKind::Vector, LayerStyle::with_color(LayerKind::Vector, Color::RED)));
    project.set_dirty(false);
    let (mut session, rx) = StylingSession::new(project, options);
    session.set_layer(Some(id)).unwrap();
    (session, id, rx)
}

/// Change the pending color of the symbology panel
pub fn set_color(session: &mut StylingSession, color: Color) {
    match session.panel_mut() {
        Some(StylePanel::Symbology(panel)) => panel.symbology.color = color,
        other => panic!("symbology panel expected, got {:?}", other),
    }
}

pub fn edit_and_apply(session: &mut StylingSession, color: Color, ms: i64) -> bool {
    set_color(session, color);
    session.apply_at(at(ms)).unwrap()
}

pub fn layer_color(session: &StylingSession, id: LayerId) -> Color {
    session.project().layer(id).unwrap().style().symbology.color
}

pub fn repaints(session: &StylingSession, id: LayerId) -> u64 {
    session.project().layer(id).unwrap().repaint_count()
}

pub fn undo_len(session: &StylingSession, id: LayerId) -> usize {
    session.undo_stack(id).map_or(0, |stack| stack.undo_len())
}

pub fn drain(rx: &mut mpsc::Receiver<StylingEvent>) -> Vec<StylingEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
