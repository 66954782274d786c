use serde::{Deserialize, Serialize};

use crate::frame::Props;
use crate::message::Message;

/// Content of a successful view response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPayload {
    pub title: String,
    pub view: String,
    #[serde(default)]
    pub props: Props,
    #[serde(default)]
    pub context: Props,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Typed result of one protocol call. Only `Render` carries frame content,
/// the rest are control signals.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolResponse {
    /// Discard in-app state and reload the whole document.
    Reload,
    Redirect { path: String },
    Render(RenderPayload),
    ServerError,
    NetworkError,
}
