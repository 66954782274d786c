pub mod commands;
pub mod session;
pub mod terminal;

pub use commands::Command;
pub use session::{Flow, Session};
