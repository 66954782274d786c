//! Unsaved-form tracking and the confirmation gate in front of navigation.
//!
//! Every mounted form that has unsaved edits registers itself as a dirty
//! source. Navigation is blocked while any source is dirty, until the user
//! confirms leaving or a caller explicitly bypasses the check.

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::debug;
use uuid::Uuid;

use crate::ports::UnloadPrompt;

pub type DirtySource = Uuid;

#[derive(Default)]
struct GuardState {
    dirty: BTreeSet<DirtySource>,
    waiters: Vec<oneshot::Sender<()>>,
    prompt_visible: bool,
}

#[derive(Clone)]
pub struct DirtyFormGuard {
    inner: Arc<Mutex<GuardState>>,
    prompt: Arc<dyn UnloadPrompt>,
    handle_browser_unload: bool,
}

impl DirtyFormGuard {
    pub fn new(prompt: Arc<dyn UnloadPrompt>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(GuardState::default())),
            prompt,
            handle_browser_unload: false,
        }
    }

    /// Also intercept tab close / document reload while dirty.
    pub fn with_browser_unload(mut self, enabled: bool) -> Self {
        self.handle_browser_unload = enabled;
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GuardState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self) -> DirtySource {
        Uuid::new_v4()
    }

    pub fn mark_dirty(&self, source: DirtySource) {
        self.lock().dirty.insert(source);
    }

    pub fn mark_clean(&self, source: DirtySource) {
        self.lock().dirty.remove(&source);
    }

    /// Scoped dirty report: dirty while the marker lives.
    pub fn marker(&self) -> DirtyFormMarker {
        let source = self.register();
        self.mark_dirty(source);
        DirtyFormMarker {
            guard: self.clone(),
            source,
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.lock().dirty.is_empty()
    }

    pub fn is_prompting(&self) -> bool {
        self.lock().prompt_visible
    }

    /// Gate that opens immediately when clean. When dirty the prompt is
    /// shown and the gate opens only once the user confirms; if the prompt
    /// is dismissed or cancelled it never opens.
    pub fn request_unload(&self) -> UnloadGate {
        let mut state = self.lock();
        if state.dirty.is_empty() {
            return UnloadGate::open();
        }

        let (tx, rx) = oneshot::channel();
        state.waiters.push(tx);
        let show = !state.prompt_visible;
        state.prompt_visible = true;
        drop(state);

        if show {
            debug!("unsaved changes, asking before leaving");
            self.prompt.show();
        }
        UnloadGate::waiting(rx)
    }

    /// The user agreed to leave. Dirty forms are abandoned with the page.
    pub fn confirm_unload(&self) {
        let waiters = {
            let mut state = self.lock();
            state.dirty.clear();
            state.prompt_visible = false;
            std::mem::take(&mut state.waiters)
        };
        self.prompt.hide();
        for waiter in waiters {
            let _ = waiter.send(());
        }
    }

    /// The user chose to stay. Pending gates never open.
    pub fn dismiss_unload(&self) {
        let had_prompt = {
            let mut state = self.lock();
            state.waiters.clear();
            std::mem::replace(&mut state.prompt_visible, false)
        };
        if had_prompt {
            self.prompt.hide();
        }
    }

    /// Explicit bypass: drops any pending prompt without waiting for the
    /// user and clears the dirty flag.
    pub fn cancel_unload(&self) {
        let had_prompt = {
            let mut state = self.lock();
            state.dirty.clear();
            state.waiters.clear();
            std::mem::replace(&mut state.prompt_visible, false)
        };
        if had_prompt {
            self.prompt.hide();
        }
    }

    /// Answer for the browser's own unload event.
    pub fn should_block_browser_unload(&self) -> bool {
        self.handle_browser_unload && self.is_dirty()
    }
}

/// Reports a form as dirty until dropped.
pub struct DirtyFormMarker {
    guard: DirtyFormGuard,
    source: DirtySource,
}

impl DirtyFormMarker {
    pub fn source(&self) -> DirtySource {
        self.source
    }
}

impl Drop for DirtyFormMarker {
    fn drop(&mut self) {
        self.guard.mark_clean(self.source);
    }
}

enum GateState {
    Open,
    Waiting(oneshot::Receiver<()>),
    Abandoned,
}

/// Future returned by [`DirtyFormGuard::request_unload`]. Resolves when
/// leaving is confirmed; stays pending forever otherwise.
pub struct UnloadGate {
    state: GateState,
}

impl UnloadGate {
    fn open() -> Self {
        Self {
            state: GateState::Open,
        }
    }

    fn waiting(rx: oneshot::Receiver<()>) -> Self {
        Self {
            state: GateState::Waiting(rx),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, GateState::Open)
    }

    /// Like awaiting the gate, but reports `false` instead of hanging when
    /// the prompt was dismissed or bypassed.
    pub async fn confirmed(self) -> bool {
        match self.state {
            GateState::Open => true,
            GateState::Waiting(rx) => rx.await.is_ok(),
            GateState::Abandoned => false,
        }
    }
}

impl Future for UnloadGate {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match &mut self.state {
            GateState::Open => Poll::Ready(()),
            GateState::Waiting(rx) => match Pin::new(rx).poll(cx) {
                Poll::Ready(Ok(())) => {
                    self.state = GateState::Open;
                    Poll::Ready(())
                }
                Poll::Ready(Err(_)) => {
                    self.state = GateState::Abandoned;
                    Poll::Pending
                }
                Poll::Pending => Poll::Pending,
            },
            GateState::Abandoned => Poll::Pending,
        }
    }
}
