//! Switching layers and pages

use mapstyle_edit::{Color, Layer, LayerId, LayerKind, StyleError, StylePage, StyleUndoState};
use pretty_assertions::assert_eq;

use crate::helpers::{create_session, edit_and_apply, layer_color, snapshot, undo_len};

#[test]
fn test_histories_are_per_layer() {
    let (mut session, roads, _rx) = create_session();
    let rivers = session.project_mut().add_layer(Layer::new("rivers", LayerKind::Vector));

    edit_and_apply(&mut session, Color::BLUE, 0);
    session.set_layer(Some(rivers)).unwrap();
    assert!(!session.can_undo());
    edit_and_apply(&mut session, Color::GREEN, 100);

    assert_eq!(undo_len(&session, roads), 1);
    assert_eq!(undo_len(&session, rivers), 1);

    session.set_layer(Some(roads)).unwrap();
    session.undo().unwrap();
    assert_eq!(layer_color(&session, roads), Color::RED);
    assert_eq!(layer_color(&session, rivers), Color::GREEN);
}

#[test]
fn test_set_layer_captures_last_style() {
    let (mut session, _roads, _rx) = create_session();
    assert_eq!(session.last_style(), Some(&snapshot(Color::RED)));
    session.set_layer(None).unwrap();
    assert_eq!(session.last_style(), None);
    assert_eq!(session.current_page(), None);
}

#[test]
fn test_unknown_layer() {
    let (mut session, roads, _rx) = create_session();
    let result = session.set_layer(Some(LayerId::next()));
    assert!(matches!(result, Err(StyleError::UnknownLayer(_))));
    assert_eq!(session.current_layer(), Some(roads));
}

#[test]
fn test_page_kept_for_same_kind() {
    let (mut session, _roads, _rx) = create_session();
    let rivers = session.project_mut().add_layer(Layer::new("rivers", LayerKind::Vector));
    let dem = session.project_mut().add_layer(Layer::new("dem", LayerKind::Raster));

    session.set_page(StylePage::Labels).unwrap();
    session.set_layer(Some(rivers)).unwrap();
    assert_eq!(session.current_page(), Some(StylePage::Labels));

    session.set_layer(Some(dem)).unwrap();
    assert_eq!(session.current_page(), Some(StylePage::Symbology));
}

#[test]
fn test_page_unavailable_for_kind() {
    let (mut session, _roads, _rx) = create_session();
    assert!(matches!(session.set_page(StylePage::Histogram), Err(StyleError::PageUnavailable { .. })));
    assert_eq!(session.current_page(), Some(StylePage::Symbology));
}

#[test]
fn test_remove_layer_drops_history() {
    let (mut session, roads, _rx) = create_session();
    edit_and_apply(&mut session, Color::BLUE, 0);

    let removed = session.remove_layer(roads).unwrap();
    assert_eq!(removed.id(), roads);
    assert_eq!(session.current_layer(), None);
    assert!(session.undo_stack(roads).is_none());
    session.undo().unwrap();
}
