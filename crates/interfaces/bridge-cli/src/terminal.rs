use std::sync::atomic::{AtomicBool, Ordering};

use bridge_app_core::{DocumentPort, UnloadPrompt};

/// The terminal stands in for the browser document. A reload is recorded
/// and carried out by the session once the current command finishes.
#[derive(Default)]
pub struct TerminalDocument {
    reload_requested: AtomicBool,
}

impl TerminalDocument {
    pub fn take_reload(&self) -> bool {
        self.reload_requested.swap(false, Ordering::SeqCst)
    }
}

impl DocumentPort for TerminalDocument {
    fn reload(&self) -> anyhow::Result<()> {
        self.reload_requested.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn set_title(&self, title: &str) {
        println!("== {title} ==");
    }
}

pub struct TerminalPrompt;

impl UnloadPrompt for TerminalPrompt {
    fn show(&self) {
        println!(":: This page has unsaved changes. Leave anyway? [confirm/stay]");
    }

    fn hide(&self) {}
}
