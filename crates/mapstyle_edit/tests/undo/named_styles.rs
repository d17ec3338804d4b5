//! Style manager operation tests

use mapstyle_edit::{Color, LayerKind, LayerStyle, StyleError, StyleSnapshot, StyleTarget, StyleUndoOp, DEFAULT_STYLE_NAME};
use pretty_assertions::assert_eq;

use crate::helpers::{snapshot, vector_layer, window};

#[test]
fn test_add_named_style_undo_redo() {
    let mut layer = vector_layer(Color::RED);
    let op = StyleUndoOp::AddNamedStyle {
        layer: layer.id(),
        name: "night".to_string(),
        snapshot: snapshot(Color::BLACK),
    };

    op.redo(&mut layer).unwrap();
    assert_eq!(layer.named_style("night"), Some(&snapshot(Color::BLACK)));
    op.undo(&mut layer).unwrap();
    assert_eq!(layer.named_style("night"), None);
    assert_eq!(layer.repaint_count(), 0);
}

#[test]
fn test_switch_named_style_round_trip() {
    let mut layer = vector_layer(Color::RED);
    layer.add_named_style("night", snapshot(Color::BLACK)).unwrap();
    let op = StyleUndoOp::SwitchNamedStyle {
        layer: layer.id(),
        old_name: DEFAULT_STYLE_NAME.to_string(),
        new_name: "night".to_string(),
        old_style: layer.write_style().unwrap(),
        new_style: snapshot(Color::BLACK),
    };

    op.redo(&mut layer).unwrap();
    assert_eq!(layer.current_style_name(), "night");
    assert_eq!(layer.style().symbology.color, Color::BLACK);
    assert_eq!(layer.named_style(DEFAULT_STYLE_NAME), Some(&snapshot(Color::RED)));

    op.undo(&mut layer).unwrap();
    assert_eq!(layer.current_style_name(), DEFAULT_STYLE_NAME);
    assert_eq!(layer.style().symbology.color, Color::RED);
    assert_eq!(layer.named_style("night"), Some(&snapshot(Color::BLACK)));
    assert_eq!(layer.repaint_count(), 2);
}

#[test]
fn test_remove_named_style_undo_fails_on_conflict() {
    let mut layer = vector_layer(Color::RED);
    layer.add_named_style("night", snapshot(Color::BLACK)).unwrap();
    let op = StyleUndoOp::RemoveNamedStyle {
        layer: layer.id(),
        name: "night".to_string(),
        snapshot: snapshot(Color::BLACK),
    };
    op.redo(&mut layer).unwrap();

    // Someone re-created the name behind the history's back
    layer.add_named_style("night", snapshot(Color::WHITE)).unwrap();
    assert!(op.undo(&mut layer).is_err());
}

#[test]
fn test_named_style_ops_never_merge() {
    let mut layer = vector_layer(Color::RED);
    let mut first = StyleUndoOp::AddNamedStyle {
        layer: layer.id(),
        name: "a".to_string(),
        snapshot: snapshot(Color::BLACK),
    };
    let second = StyleUndoOp::AddNamedStyle {
        layer: layer.id(),
        name: "b".to_string(),
        snapshot: snapshot(Color::BLACK),
    };
    assert!(!first.merge_with(&second, window()));
    first.redo(&mut layer).unwrap();
    assert_eq!(layer.style_names(), vec!["a".to_string(), DEFAULT_STYLE_NAME.to_string()]);
}

#[test]
fn test_failed_switch_undo_keeps_layer() {
    let mut layer = vector_layer(Color::RED);
    let raster = StyleSnapshot::capture(&LayerStyle::default_for(LayerKind::Raster)).unwrap();
    layer.add_named_style("night", snapshot(Color::BLACK)).unwrap();
    let op = StyleUndoOp::SwitchNamedStyle {
        layer: layer.id(),
        old_name: DEFAULT_STYLE_NAME.to_string(),
        new_name: "night".to_string(),
        old_style: raster,
        new_style: snapshot(Color::BLACK),
    };
    op.redo(&mut layer).unwrap();
    let repaints = layer.repaint_count();

    assert!(matches!(op.undo(&mut layer), Err(StyleError::IncompatibleStyle { .. })));
    assert_eq!(layer.current_style_name(), "night");
    assert_eq!(layer.style().symbology.color, Color::BLACK);
    assert_eq!(layer.named_style("night"), None);
    assert_eq!(layer.repaint_count(), repaints);
    assert_eq!(layer.error().len(), 1);
}
