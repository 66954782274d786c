pub mod commands;
pub mod events;
pub mod reducer;
pub mod store;

pub use commands::{NavCommand, NavigateOptions};
pub use events::FrameEvent;
pub use reducer::reduce;
pub use store::FrameStore;
