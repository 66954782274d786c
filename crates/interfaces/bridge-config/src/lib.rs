//! Central configuration constants for the wire protocol and user-facing defaults.

/// App marker sent in the request marker header and embedded in the
/// response status header name.
pub const DEFAULT_APP_MARKER: &str = "DjangoBridge";

/// Request header identifying an in-app navigation call.
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";

/// HTTP status that is always treated as a generic server failure.
pub const SERVER_ERROR_STATUS: u16 = 500;

/// Message shown when the server answers with a 500.
pub const SERVER_ERROR_TEXT: &str = "A server error occurred. Please try again later.";

/// Message shown when the request could not complete at all.
pub const NETWORK_ERROR_TEXT: &str =
    "A network error occurred. Please check your internet connection or try again later.";

/// Capacity of the controller's internal event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 100;

/// First frame id handed out by a freshly bootstrapped controller.
pub const INITIAL_FRAME_ID: u64 = 0;

/// Name of the response header whose presence marks a structured payload,
/// e.g. `X-DjangoBridge-Status`.
pub fn status_header_name(app_marker: &str) -> String {
    format!("X-{app_marker}-Status")
}
