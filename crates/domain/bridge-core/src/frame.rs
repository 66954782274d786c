use serde::{Deserialize, Serialize};
use std::fmt;

/// Mapping of view-specific data, or of context values keyed by provider name.
pub type Props = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(pub u64);

impl FrameId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One rendered page in the lifetime of the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: FrameId,
    /// Path, query and hash this frame represents.
    pub path: String,
    pub view: String,
    pub props: Props,
    pub context: Props,
}

impl Frame {
    /// Value handed to the named context provider; providers without a
    /// value receive `null`.
    pub fn context_value(&self, provider: &str) -> serde_json::Value {
        self.context
            .get(provider)
            .cloned()
            .unwrap_or(serde_json::Value::Null)
    }
}
