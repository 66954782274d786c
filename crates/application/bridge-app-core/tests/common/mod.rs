#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bridge_app_core::{
    DirtyFormGuard, DocumentPort, FrameStore, MemoryHistory, NavigationController,
    ProtocolClient, ProtocolError, UnloadPrompt,
};
use bridge_core::{Message, ProtocolRequest, ProtocolResponse, RenderPayload};
use tokio::sync::{mpsc, oneshot};

/// A request the controller issued, waiting for the test to answer it.
pub struct PendingCall {
    pub request: ProtocolRequest,
    reply: oneshot::Sender<Result<ProtocolResponse, ProtocolError>>,
}

impl PendingCall {
    pub fn respond(self, response: ProtocolResponse) {
        let _ = self.reply.send(Ok(response));
    }

    pub fn fail(self, error: ProtocolError) {
        let _ = self.reply.send(Err(error));
    }
}

/// Client whose responses are released by the test, in any order.
pub struct GatedClient {
    calls: mpsc::UnboundedSender<PendingCall>,
}

#[async_trait::async_trait]
impl ProtocolClient for GatedClient {
    async fn send(&self, request: ProtocolRequest) -> Result<ProtocolResponse, ProtocolError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.calls.send(PendingCall { request, reply });
        rx.await.unwrap_or(Ok(ProtocolResponse::NetworkError))
    }
}

pub struct Server {
    calls: mpsc::UnboundedReceiver<PendingCall>,
}

impl Server {
    pub async fn next(&mut self) -> PendingCall {
        tokio::time::timeout(Duration::from_secs(1), self.calls.recv())
            .await
            .expect("no request was issued")
            .expect("client dropped")
    }

    /// Two outstanding calls, ordered by path.
    pub async fn next_pair(&mut self) -> (PendingCall, PendingCall) {
        let first = self.next().await;
        let second = self.next().await;
        if first.request.path <= second.request.path {
            (first, second)
        } else {
            (second, first)
        }
    }

    pub fn assert_idle(&mut self) {
        assert!(self.calls.try_recv().is_err(), "unexpected request");
    }
}

pub fn gated_client() -> (GatedClient, Server) {
    let (tx, rx) = mpsc::unbounded_channel();
    (GatedClient { calls: tx }, Server { calls: rx })
}

#[derive(Default)]
pub struct RecordingDocument {
    pub reloads: AtomicUsize,
    pub titles: Mutex<Vec<String>>,
}

impl RecordingDocument {
    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    pub fn last_title(&self) -> Option<String> {
        self.titles.lock().unwrap().last().cloned()
    }
}

impl DocumentPort for RecordingDocument {
    fn reload(&self) -> anyhow::Result<()> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn set_title(&self, title: &str) {
        self.titles.lock().unwrap().push(title.to_string());
    }
}

#[derive(Default)]
pub struct RecordingPrompt {
    pub shown: AtomicUsize,
}

impl UnloadPrompt for RecordingPrompt {
    fn show(&self) {
        self.shown.fetch_add(1, Ordering::SeqCst);
    }

    fn hide(&self) {}
}

pub type Controller = NavigationController<GatedClient, MemoryHistory, RecordingDocument>;

pub struct Harness {
    pub controller: Controller,
    pub server: Server,
    pub history: Arc<MemoryHistory>,
    pub document: Arc<RecordingDocument>,
    pub prompt: Arc<RecordingPrompt>,
    pub guard: DirtyFormGuard,
}

/// Controller that has not been bootstrapped yet, opened at `/`.
pub fn fresh() -> Harness {
    let (client, server) = gated_client();
    let history = Arc::new(MemoryHistory::new("/"));
    let document = Arc::new(RecordingDocument::default());
    let prompt = Arc::new(RecordingPrompt::default());
    let guard = DirtyFormGuard::new(prompt.clone());
    let controller = NavigationController::new(
        FrameStore::default(),
        guard.clone(),
        client,
        history.clone(),
        document.clone(),
    );
    Harness {
        controller,
        server,
        history,
        document,
        prompt,
        guard,
    }
}

/// Controller showing frame 0 (`Home` at `/`).
pub fn bootstrapped() -> Harness {
    let mut h = fresh();
    let ticket = h.controller.bootstrap(render("Home"), "/");
    assert!(ticket.is_none());
    h
}

pub fn payload(view: &str) -> RenderPayload {
    RenderPayload {
        title: format!("{view} page"),
        view: view.to_string(),
        props: Default::default(),
        context: Default::default(),
        messages: Vec::new(),
    }
}

pub fn render(view: &str) -> ProtocolResponse {
    ProtocolResponse::Render(payload(view))
}

pub fn render_with(
    view: &str,
    props: serde_json::Value,
    messages: Vec<Message>,
) -> ProtocolResponse {
    let mut p = payload(view);
    p.props = props.as_object().cloned().unwrap_or_default();
    p.messages = messages;
    ProtocolResponse::Render(p)
}
