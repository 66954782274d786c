use crate::history::HistoryEntry;

pub use bridge_infra::{ProtocolClient, ProtocolError};

/// Browser history as seen by the controller.
pub trait HistoryPort: Send + Sync + 'static {
    fn push(&self, entry: HistoryEntry);
    /// Overwrite the current entry without growing the stack.
    fn replace(&self, entry: HistoryEntry);
    fn location(&self) -> String;
}

/// The hosting document.
pub trait DocumentPort: Send + Sync + 'static {
    /// Full reload; in-app state is gone afterwards.
    fn reload(&self) -> anyhow::Result<()>;
    fn set_title(&self, title: &str);
}

/// Surfaces the "leave page?" confirmation for unsaved forms.
pub trait UnloadPrompt: Send + Sync + 'static {
    fn show(&self);
    fn hide(&self);
}
