use bridge_core::{Frame, FrameId, Message};

/// Phase of the single navigation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationPhase {
    #[default]
    Idle,
    /// Parked behind the dirty form confirmation.
    AwaitingUnload,
    Requesting,
    Redirecting,
}

#[derive(Debug, Clone)]
pub struct NavigationState {
    pub current_frame: Option<Frame>,
    pub next_frame_id: FrameId,
    pub phase: NavigationPhase,
    /// A refresh of the current frame is outstanding.
    pub refreshing: bool,
    pub messages: Vec<Message>,
}

impl NavigationState {
    pub fn page_loading(&self) -> bool {
        self.refreshing
            || matches!(
                self.phase,
                NavigationPhase::Requesting | NavigationPhase::Redirecting
            )
    }

    /// True until the first frame exists.
    pub fn is_loading(&self) -> bool {
        self.current_frame.is_none()
    }

    pub fn current_frame_id(&self) -> Option<FrameId> {
        self.current_frame.as_ref().map(|f| f.id)
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            current_frame: None,
            next_frame_id: FrameId(bridge_config::INITIAL_FRAME_ID),
            phase: NavigationPhase::Idle,
            refreshing: false,
            messages: Vec::new(),
        }
    }
}
