use serde::{Deserialize, Serialize};

use crate::frame::FrameId;

/// Ordered form fields, submitted url-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData(pub Vec<(String, String)>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post(FormData),
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post(_) => "POST",
        }
    }
}

/// One outgoing call for the protocol client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolRequest {
    pub path: String,
    pub method: Method,
}

impl ProtocolRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::Get,
        }
    }

    pub fn post(path: impl Into<String>, data: FormData) -> Self {
        Self {
            path: path.into(),
            method: Method::Post(data),
        }
    }
}

/// What a committed frame does to browser history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    /// Overwrite the current entry (bootstrap and bootstrap redirects).
    Replace,
    /// The browser already moved (back/forward).
    Leave,
}

impl HistoryMode {
    pub fn from_push_state(push_state: bool) -> Self {
        if push_state {
            HistoryMode::Push
        } else {
            HistoryMode::Leave
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentEffect {
    /// Success replaces the current frame with a fresh one.
    NewFrame { history: HistoryMode },
    /// Success mutates the given frame in place, if it is still current.
    UpdateFrame { frame_id: FrameId },
}

/// An in-flight request plus the policy for applying its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    pub request: ProtocolRequest,
    pub effect: IntentEffect,
}

impl NavigationIntent {
    pub fn creates_frame(&self) -> bool {
        matches!(self.effect, IntentEffect::NewFrame { .. })
    }

    /// Follow-up GET issued for a redirect. History policy is carried over
    /// so the final target gets the single entry.
    pub fn redirected(&self, path: impl Into<String>) -> Self {
        let effect = match self.effect {
            IntentEffect::NewFrame { history } => IntentEffect::NewFrame { history },
            IntentEffect::UpdateFrame { .. } => IntentEffect::NewFrame {
                history: HistoryMode::Push,
            },
        };
        Self {
            request: ProtocolRequest::get(path),
            effect,
        }
    }
}
