pub mod frame;
pub mod intent;
pub mod message;
pub mod protocol;

pub use frame::{Frame, FrameId, Props};
pub use intent::{FormData, HistoryMode, IntentEffect, Method, NavigationIntent, ProtocolRequest};
pub use message::{Message, MessageBody, MessageLevel};
pub use protocol::{ProtocolResponse, RenderPayload};
