//! Session notifications

use std::time::Instant;

use mapstyle_edit::{Color, StyleUndoState, StylingEvent};
use pretty_assertions::assert_eq;

use crate::helpers::{create_session, drain, edit_and_apply, set_color};

#[test]
fn test_events_for_apply_and_undo() {
    let (mut session, id, mut rx) = create_session();
    assert_eq!(drain(&mut rx), vec![StylingEvent::CurrentLayerChanged { layer: Some(id) }]);

    edit_and_apply(&mut session, Color::BLUE, 0);
    assert_eq!(
        drain(&mut rx),
        vec![
            StylingEvent::HistoryChanged {
                layer: id,
                can_undo: true,
                can_redo: false
            },
            StylingEvent::StyleChanged { layer: id },
        ]
    );

    session.undo().unwrap();
    assert_eq!(
        drain(&mut rx),
        vec![StylingEvent::HistoryChanged {
            layer: id,
            can_undo: false,
            can_redo: true
        }]
    );
}

#[test]
fn test_unchanged_apply_is_silent() {
    let (mut session, _id, mut rx) = create_session();
    drain(&mut rx);
    session.apply().unwrap();
    assert_eq!(drain(&mut rx), Vec::new());
}

#[test]
fn test_closed_receiver_does_not_block() {
    let (mut session, id, rx) = create_session();
    drop(rx);
    edit_and_apply(&mut session, Color::BLUE, 0);
    session.set_layer(None).unwrap();
    session.set_layer(Some(id)).unwrap();
    assert_eq!(session.current_layer(), Some(id));
}

#[test]
fn test_removing_current_layer_clears_selection() {
    let (mut session, id, mut rx) = create_session();
    drain(&mut rx);
    set_color(&mut session, Color::BLUE);
    session.request_auto_apply(Instant::now());

    assert!(session.remove_layer(id).is_some());
    assert_eq!(drain(&mut rx), vec![StylingEvent::CurrentLayerChanged { layer: None }]);
    assert_eq!(session.current_layer(), None);
    assert_eq!(session.panel(), None);
    assert_eq!(session.last_style(), None);
    assert!(!session.auto_apply_pending());
}
