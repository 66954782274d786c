pub mod error;
pub mod net;

// Re-exports for convenience
pub use error::ProtocolError;
pub use net::{decode_payload, HttpProtocolClient, ProtocolClient, ProtocolConfig};
