use bridge_core::Frame;

use crate::domain::{NavigationPhase, NavigationState};

use super::events::FrameEvent;

pub fn reduce(mut state: NavigationState, ev: FrameEvent) -> NavigationState {
    match ev {
        FrameEvent::PhaseChanged(phase) => state.phase = phase,

        FrameEvent::FrameCommitted { path, payload } => {
            let id = state.next_frame_id;
            state.next_frame_id = id.next();
            state.current_frame = Some(Frame {
                id,
                path,
                view: payload.view,
                props: payload.props,
                context: payload.context,
            });
            // A new frame starts with only the messages sent alongside it.
            state.messages = payload.messages;
            state.phase = NavigationPhase::Idle;
        }

        FrameEvent::FrameUpdated { frame_id, payload } => {
            if let Some(frame) = state.current_frame.as_mut().filter(|f| f.id == frame_id) {
                frame.view = payload.view;
                frame.props = payload.props;
                frame.context = payload.context;
                state.messages.extend(payload.messages);
                }
        }

        FrameEvent::PathReplaced { frame_id, path } => {
            if let Some(frame) = state.current_frame.as_mut().filter(|f| f.id == frame_id) {
                frame.path = path;
            }
        }

        FrameEvent::RefreshStarted => state.refreshing = true,
        FrameEvent::RefreshSettled => state.refreshing = false,

        FrameEvent::MessagePushed(message) => state.messages.push(message),
    }
    state
}
