use bridge_core::{ProtocolResponse, RenderPayload};
use serde::Deserialize;

use crate::error::ProtocolError;

/// JSON body shape, tagged by `status`.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
enum WirePayload {
    Reload,
    Redirect { path: String },
    Render(RenderPayload),
    ServerError,
    NetworkError,
}

impl From<WirePayload> for ProtocolResponse {
    fn from(value: WirePayload) -> Self {
        match value {
            WirePayload::Reload => ProtocolResponse::Reload,
            WirePayload::Redirect { path } => ProtocolResponse::Redirect { path },
            WirePayload::Render(payload) => ProtocolResponse::Render(payload),
            WirePayload::ServerError => ProtocolResponse::ServerError,
            WirePayload::NetworkError => ProtocolResponse::NetworkError,
        }
    }
}

/// Decode a structured payload, either a response body or the initial
/// payload embedded in the server-rendered page.
pub fn decode_payload(bytes: &[u8]) -> Result<ProtocolResponse, ProtocolError> {
    let payload: WirePayload = serde_json::from_slice(bytes)?;
    Ok(payload.into())
}
