use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::domain::NavigationState;

use super::{events::FrameEvent, reducer::reduce};

/// Shared frame slot. Subscribers are notified with a revision number after
/// every applied event.
#[derive(Clone)]
pub struct FrameStore {
    inner: Arc<Mutex<NavigationState>>,
    revision: Arc<watch::Sender<u64>>,
}

impl FrameStore {
    pub fn new(state: NavigationState) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Mutex::new(state)),
            revision: Arc::new(revision),
        }
    }

    pub fn state(&self) -> NavigationState {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn apply(&self, ev: FrameEvent) {
        {
            let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            let next = reduce(guard.clone(), ev);
            *guard = next;
        }
        self.revision.send_modify(|r| *r += 1);
    }

    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&NavigationState) -> R) -> R {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new(NavigationState::default())
    }
}
