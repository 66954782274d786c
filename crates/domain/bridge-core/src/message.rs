use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageBody {
    Text(String),
    /// Pre-rendered markup supplied by the server.
    Html(String),
}

/// A toast-style message, either sent by the server with a render or
/// synthesized locally when a request fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub level: MessageLevel,
    #[serde(flatten)]
    pub body: MessageBody,
}

impl Message {
    pub fn text(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            body: MessageBody::Text(text.into()),
        }
    }

    pub fn html(level: MessageLevel, html: impl Into<String>) -> Self {
        Self {
            level,
            body: MessageBody::Html(html.into()),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::text(MessageLevel::Error, text)
    }

    pub fn as_str(&self) -> &str {
        match &self.body {
            MessageBody::Text(s) | MessageBody::Html(s) => s,
        }
    }
}
