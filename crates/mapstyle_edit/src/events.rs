//! Notifications sent by the styling session.
//!
//! Observers receive these through the channel returned by
//! `StylingSession::new`. Events are sent with `try_send`: a full or closed
//! channel drops them instead of blocking the edit.

use mapstyle_engine::LayerId;

/// Capacity of the session's event channel
pub const EVENT_CHANNEL_SIZE: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StylingEvent {
    /// The style of a layer was changed by an apply
    StyleChanged { layer: LayerId },
    /// Another layer (or none) is being styled
    CurrentLayerChanged { layer: Option<LayerId> },
    /// The undo history of a layer changed
    HistoryChanged { layer: LayerId, can_undo: bool, can_redo: bool },
}
