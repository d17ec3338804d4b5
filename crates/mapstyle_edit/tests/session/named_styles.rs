//! Style manager through the session

use mapstyle_edit::{Color, LayerKind, LayerStyle, StyleError, StyleSnapshot, StyleUndoState, DEFAULT_STYLE_NAME};
use pretty_assertions::assert_eq;

use crate::helpers::{create_session, edit_and_apply, layer_color, snapshot};

#[test]
fn test_add_switch_and_undo() {
    let (mut session, id, _rx) = create_session();
    session.add_named_style("day").unwrap();
    edit_and_apply(&mut session, Color::BLUE, 5000);

    session.switch_named_style("day").unwrap();
    assert_eq!(layer_color(&session, id), Color::RED);
    assert_eq!(session.project().layer(id).unwrap().current_style_name(), "day");
    assert_eq!(session.last_style(), Some(&snapshot(Color::RED)));
    assert_eq!(session.undo_description(), Some("Switch Style to 'day'".to_string()));

    session.undo().unwrap();
    assert_eq!(layer_color(&session, id), Color::BLUE);
    assert_eq!(session.project().layer(id).unwrap().current_style_name(), DEFAULT_STYLE_NAME);
}

#[test]
fn test_add_duplicate_fails_without_history() {
    let (mut session, id, _rx) = create_session();
    session.add_named_style("day").unwrap();
    assert!(matches!(session.add_named_style("day"), Err(StyleError::DuplicateStyleName { .. })));
    assert_eq!(session.undo_stack(id).unwrap().undo_len(), 1);
}

#[test]
fn test_remove_and_undo() {
    let (mut session, id, _rx) = create_session();
    session.add_named_style("day").unwrap();
    session.remove_named_style("day").unwrap();
    assert_eq!(session.project().layer(id).unwrap().named_style("day"), None);

    session.undo().unwrap();
    assert_eq!(session.project().layer(id).unwrap().named_style("day"), Some(&snapshot(Color::RED)));
}

#[test]
fn test_remove_current_style_fails() {
    let (mut session, _id, _rx) = create_session();
    assert!(matches!(
        session.remove_named_style(DEFAULT_STYLE_NAME),
        Err(StyleError::RemoveCurrentStyle { .. })
    ));
    assert!(matches!(session.remove_named_style("missing"), Err(StyleError::UnknownStyleName { .. })));
    assert!(matches!(session.switch_named_style("missing"), Err(StyleError::UnknownStyleName { .. })));
}

#[test]
fn test_remove_current_style_after_switch() {
    let (mut session, _id, _rx) = create_session();
    session.add_named_style("day").unwrap();
    session.switch_named_style("day").unwrap();
    assert!(matches!(session.remove_named_style("day"), Err(StyleError::RemoveCurrentStyle { .. })));
    assert!(session.remove_named_style(DEFAULT_STYLE_NAME).is_ok());
}

#[test]
fn test_failed_switch_keeps_layer_and_history() {
    let (mut session, id, _rx) = create_session();
    let raster = StyleSnapshot::capture(&LayerStyle::default_for(LayerKind::Raster)).unwrap();
    session.project_mut().layer_mut(id).unwrap().add_named_style("dem", raster.clone()).unwrap();

    assert!(matches!(session.switch_named_style("dem"), Err(StyleError::IncompatibleStyle { .. })));

    let layer = session.project().layer(id).unwrap();
    assert_eq!(layer.current_style_name(), DEFAULT_STYLE_NAME);
    assert_eq!(layer.named_style("dem"), Some(&raster));
    assert_eq!(layer.style_names(), vec![DEFAULT_STYLE_NAME.to_string(), "dem".to_string()]);
    assert_eq!(layer_color(&session, id), Color::RED);
    assert_eq!(session.last_style(), Some(&snapshot(Color::RED)));
    assert!(session.undo_stack(id).map_or(true, |stack| stack.undo_len() == 0));
    assert!(!session.can_undo());
}
