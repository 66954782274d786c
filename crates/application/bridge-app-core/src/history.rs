//! History entries and an in-memory browser history.

use std::sync::{Mutex, PoisonError};

use bridge_core::FrameId;

use crate::ports::HistoryPort;

/// State stored with each history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Frame that was current for this entry; `None` for the entry the page
    /// was opened with before bootstrap.
    pub frame_id: Option<FrameId>,
    pub path: String,
}

struct Stack {
    entries: Vec<HistoryEntry>,
    index: usize,
}

/// Session history with back/forward, for hosts without a real browser.
/// `back` and `forward` return the location a pop event should carry.
pub struct MemoryHistory {
    stack: Mutex<Stack>,
}

impl MemoryHistory {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            stack: Mutex::new(Stack {
                entries: vec![HistoryEntry {
                    frame_id: None,
                    path: initial_path.into(),
                }],
                index: 0,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Stack> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn back(&self) -> Option<String> {
        let mut stack = self.lock();
        if stack.index == 0 {
            return None;
        }
        stack.index -= 1;
        Some(stack.entries[stack.index].path.clone())
    }

    pub fn forward(&self) -> Option<String> {
        let mut stack = self.lock();
        if stack.index + 1 >= stack.entries.len() {
            return None;
        }
        stack.index += 1;
        Some(stack.entries[stack.index].path.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().entries.clone()
    }

    pub fn current(&self) -> HistoryEntry {
        let stack = self.lock();
        stack.entries[stack.index].clone()
    }
}

impl HistoryPort for MemoryHistory {
    fn push(&self, entry: HistoryEntry) {
        let mut stack = self.lock();
        let keep = stack.index + 1;
        stack.entries.truncate(keep);
        stack.entries.push(entry);
        stack.index = keep;
    }

    fn replace(&self, entry: HistoryEntry) {
        let mut stack = self.lock();
        let index = stack.index;
        stack.entries[index] = entry;
    }

    fn location(&self) -> String {
        self.current().path
    }
}
