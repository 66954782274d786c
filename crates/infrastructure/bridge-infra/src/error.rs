/// Contract violations on the protocol boundary. Transport failures and 500s
/// are not errors here: they map to `ProtocolResponse` variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid request path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },
    #[error("malformed protocol payload: {reason}")]
    Malformed { reason: String },
}

impl From<serde_json::Error> for ProtocolError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed {
            reason: value.to_string(),
        }
    }
}
