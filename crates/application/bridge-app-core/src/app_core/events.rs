use bridge_core::{FrameId, Message, RenderPayload};

use crate::domain::NavigationPhase;

#[derive(Debug, Clone)]
pub enum FrameEvent {
    // Navigation slot
    PhaseChanged(NavigationPhase),

    // Frame lifecycle
    FrameCommitted {
        path: String,
        payload: RenderPayload,
    },
    FrameUpdated {
        frame_id: FrameId,
        payload: RenderPayload,
    },
    PathReplaced {
        frame_id: FrameId,
        path: String,
    },

    // Refresh of the current frame
    RefreshStarted,
    RefreshSettled,

    // User-visible messages
    MessagePushed(Message),
}
