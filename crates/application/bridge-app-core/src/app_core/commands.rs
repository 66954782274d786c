use bridge_core::{FormData, FrameId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    pub push_state: bool,
    /// Skip the unsaved-form confirmation and clear any pending prompt.
    pub skip_dirty_form_check: bool,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            push_state: true,
            skip_dirty_form_check: false,
        }
    }
}

impl NavigateOptions {
    pub fn without_push(mut self) -> Self {
        self.push_state = false;
        self
    }

    pub fn skipping_dirty_check(mut self) -> Self {
        self.skip_dirty_form_check = true;
        self
    }
}

#[derive(Debug, Clone)]
pub enum NavCommand {
    // Frame-creating
    Navigate {
        path: String,
        options: NavigateOptions,
    },
    SubmitForm {
        path: String,
        data: FormData,
    },

    // In-place
    ReplacePath {
        frame_id: FrameId,
        path: String,
    },
    RefreshProps,

    // Browser back/forward
    PopState {
        location: String,
    },
}
