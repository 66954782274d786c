use std::sync::Arc;

use bridge_config::{EVENT_CHANNEL_CAPACITY, NETWORK_ERROR_TEXT, SERVER_ERROR_TEXT};
use bridge_core::{
    FormData, Frame, FrameId, HistoryMode, IntentEffect, Message, NavigationIntent,
    ProtocolRequest, ProtocolResponse, RenderPayload,
};
use tokio::sync::oneshot::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::app_core::{FrameEvent, FrameStore, NavCommand, NavigateOptions};
use crate::dirty_form::DirtyFormGuard;
use crate::domain::{NavigationPhase, NavigationState};
use crate::history::HistoryEntry;
use crate::ports::{DocumentPort, HistoryPort, ProtocolClient, ProtocolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Server,
    Network,
}

/// How a navigation ended. Failures reported here were already surfaced
/// to the user as messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Committed { frame_id: FrameId },
    Updated { frame_id: FrameId },
    Failed(FailureKind),
    Reloaded,
    /// A newer intent took over; the response was dropped.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("no frame has been loaded yet")]
    NoCurrentFrame,
}

pub type NavigationResult = Result<NavigationOutcome, NavigationError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketStatus {
    Pending,
    Settled(NavigationResult),
    /// Blocked at the unload prompt and never released.
    Abandoned,
}

/// Completion handle for one navigation call.
pub struct NavigationTicket {
    rx: oneshot::Receiver<NavigationResult>,
    settled: Option<NavigationResult>,
    abandoned: bool,
}

impl NavigationTicket {
    fn channel() -> (oneshot::Sender<NavigationResult>, Self) {
        let (tx, rx) = oneshot::channel();
        (
            tx,
            Self {
                rx,
                settled: None,
                abandoned: false,
            },
        )
    }

    fn resolved(result: NavigationResult) -> Self {
        let (tx, ticket) = Self::channel();
        let _ = tx.send(result);
        ticket
    }

    pub fn status(&mut self) -> TicketStatus {
        if let Some(result) = &self.settled {
            return TicketStatus::Settled(result.clone());
        }
        if self.abandoned {
            return TicketStatus::Abandoned;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.settled = Some(result.clone());
                TicketStatus::Settled(result)
            }
            Err(TryRecvError::Empty) => TicketStatus::Pending,
            Err(TryRecvError::Closed) => {
                self.abandoned = true;
                TicketStatus::Abandoned
            }
        }
    }
}

struct InFlight {
    intent: NavigationIntent,
    /// Slot generation at issue time; compared before anything is applied.
    generation: u64,
    /// Navigation generation at issue time. Equal to `generation` for
    /// frame-creating intents.
    navigation: u64,
    reply: oneshot::Sender<NavigationResult>,
}

enum NavEvent {
    UnloadConfirmed(InFlight),
    UnloadAbandoned(InFlight),
    Responded {
        flight: InFlight,
        result: Result<ProtocolResponse, ProtocolError>,
    },
}

/// Owns the frame slot and turns navigation intents into protocol calls.
///
/// Calls run as spawned tasks and report back over a channel; results are
/// applied only when the owner drives the controller with [`tick`],
/// [`next_event`] or [`settle`], so all state changes happen on the owner's
/// task.
///
/// [`tick`]: NavigationController::tick
/// [`next_event`]: NavigationController::next_event
/// [`settle`]: NavigationController::settle
pub struct NavigationController<C, H, D> {
    pub store: FrameStore,
    guard: DirtyFormGuard,
    client: Arc<C>,
    history: Arc<H>,
    document: Arc<D>,

    generation: u64,
    refresh_generation: u64,

    tx: mpsc::Sender<NavEvent>,
    rx: mpsc::Receiver<NavEvent>,
}

impl<C, H, D> NavigationController<C, H, D>
where
    C: ProtocolClient,
    H: HistoryPort,
    D: DocumentPort,
{
    pub fn new(
        store: FrameStore,
        guard: DirtyFormGuard,
        client: C,
        history: Arc<H>,
        document: Arc<D>,
    ) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            guard,
            client: Arc::new(client),
            history,
            document,
            generation: 0,
            refresh_generation: 0,
            tx,
            rx,
        }
    }

    pub fn guard(&self) -> &DirtyFormGuard {
        &self.guard
    }

    pub fn state(&self) -> NavigationState {
        self.store.state()
    }

    pub fn current_frame(&self) -> Option<Frame> {
        self.store.with_state(|s| s.current_frame.clone())
    }

    pub fn page_loading(&self) -> bool {
        self.store.with_state(NavigationState::page_loading)
    }

    pub fn is_loading(&self) -> bool {
        self.store.with_state(NavigationState::is_loading)
    }

    pub fn phase(&self) -> NavigationPhase {
        self.store.with_state(|s| s.phase)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.store.with_state(|s| s.messages.clone())
    }

    pub fn push_message(&self, message: Message) {
        self.store.apply(FrameEvent::MessagePushed(message));
    }

    /// Seed the controller with the payload the page was served with.
    /// A redirect starts an unguarded navigation whose ticket is returned.
    pub fn bootstrap(
        &mut self,
        initial: ProtocolResponse,
        initial_path: impl Into<String>,
    ) -> Option<NavigationTicket> {
        match initial {
            ProtocolResponse::Render(payload) => {
                self.commit_frame(initial_path.into(), payload, HistoryMode::Replace);
                None
            }
            ProtocolResponse::Redirect { path } => {
                let intent = NavigationIntent {
                    request: ProtocolRequest::get(path),
                    effect: IntentEffect::NewFrame {
                        history: HistoryMode::Replace,
                    },
                };
                Some(self.start(intent, false))
            }
            ProtocolResponse::Reload => {
                self.reload();
                None
            }
            ProtocolResponse::ServerError => {
                self.fail(FailureKind::Server);
                None
            }
            ProtocolResponse::NetworkError => {
                self.fail(FailureKind::Network);
                None
            }
        }
    }

    pub fn dispatch(&mut self, cmd: NavCommand) -> Option<NavigationTicket> {
        match cmd {
            NavCommand::Navigate { path, options } => Some(self.navigate(path, options)),
            NavCommand::SubmitForm { path, data } => Some(self.submit_form(path, data)),
            NavCommand::ReplacePath { frame_id, path } => {
                self.replace_path(frame_id, path);
                None
            }
            NavCommand::RefreshProps => Some(self.refresh_props()),
            NavCommand::PopState { location } => Some(self.pop_state(location)),
        }
    }

    pub fn navigate(
        &mut self,
        path: impl Into<String>,
        options: NavigateOptions,
    ) -> NavigationTicket {
        let intent = NavigationIntent {
            request: ProtocolRequest::get(path),
            effect: IntentEffect::NewFrame {
                history: HistoryMode::from_push_state(options.push_state),
            },
        };
        if options.skip_dirty_form_check {
            self.guard.cancel_unload();
            return self.start(intent, false);
        }
        self.start(intent, true)
    }

    pub fn submit_form(&mut self, path: impl Into<String>, data: FormData) -> NavigationTicket {
        let intent = NavigationIntent {
            request: ProtocolRequest::post(path, data),
            effect: IntentEffect::NewFrame {
                history: HistoryMode::Push,
            },
        };
        self.start(intent, true)
    }

    /// Browser back/forward: the address bar already moved, so nothing is
    /// pushed, but leaving a dirty form still asks first.
    pub fn pop_state(&mut self, location: impl Into<String>) -> NavigationTicket {
        self.navigate(location, NavigateOptions::default().without_push())
    }

    /// Rewrite the path of the current frame in place. Returns `false` and
    /// does nothing when `frame_id` is no longer current.
    pub fn replace_path(&mut self, frame_id: FrameId, path: impl Into<String>) -> bool {
        if self.store.with_state(|s| s.current_frame_id()) != Some(frame_id) {
            debug!("ignoring path update for stale frame {frame_id}");
            return false;
        }
        let path = path.into();
        self.store.apply(FrameEvent::PathReplaced {
            frame_id,
            path: path.clone(),
        });
        self.history.replace(HistoryEntry {
            frame_id: Some(frame_id),
            path,
        });
        true
    }

    /// Re-fetch the current frame's path and update it in place.
    pub fn refresh_props(&mut self) -> NavigationTicket {
        let Some(frame) = self.current_frame() else {
            return NavigationTicket::resolved(Err(NavigationError::NoCurrentFrame));
        };

        self.refresh_generation += 1;
        let (reply, ticket) = NavigationTicket::channel();
        self.issue(InFlight {
            intent: NavigationIntent {
                request: ProtocolRequest::get(frame.path),
                effect: IntentEffect::UpdateFrame { frame_id: frame.id },
            },
            generation: self.refresh_generation,
            navigation: self.generation,
            reply,
        });
        ticket
    }

    /// Apply every event that is ready without waiting.
    pub fn tick(&mut self) {
        while let Ok(ev) = self.rx.try_recv() {
            self.handle(ev);
        }
    }

    /// Wait for and apply the next event.
    pub async fn next_event(&mut self) -> bool {
        match self.rx.recv().await {
            Some(ev) => {
                self.handle(ev);
                true
            }
            None => false,
        }
    }

    /// Drive the controller until `ticket` resolves. Returns `None` when the
    /// navigation was abandoned at the unload prompt. Waits indefinitely while
    /// the prompt is still open.
    pub async fn settle(&mut self, mut ticket: NavigationTicket) -> Option<NavigationResult> {
        loop {
            match ticket.status() {
                TicketStatus::Settled(result) => return Some(result),
                TicketStatus::Abandoned => return None,
                TicketStatus::Pending => {}
            }
            if !self.next_event().await {
                return None;
            }
        }
    }

    fn start(&mut self, intent: NavigationIntent, guarded: bool) -> NavigationTicket {
        self.generation += 1;
        let (reply, ticket) = NavigationTicket::channel();
        let flight = InFlight {
            intent,
            generation: self.generation,
            navigation: self.generation,
            reply,
        };

        if !guarded {
            self.issue(flight);
            return ticket;
        }

        let gate = self.guard.request_unload();
        if gate.is_open() {
            self.issue(flight);
            return ticket;
        }

        self.store
            .apply(FrameEvent::PhaseChanged(NavigationPhase::AwaitingUnload));
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let ev = if gate.confirmed().await {
                NavEvent::UnloadConfirmed(flight)
            } else {
                NavEvent::UnloadAbandoned(flight)
            };
            let _ = tx.send(ev).await;
        });
        ticket
    }

    fn issue(&mut self, flight: InFlight) {
        match flight.intent.effect {
            IntentEffect::NewFrame { .. } => self
                .store
                .apply(FrameEvent::PhaseChanged(NavigationPhase::Requesting)),
            IntentEffect::UpdateFrame { .. } => self.store.apply(FrameEvent::RefreshStarted),
        }
        debug!(
            "{} {} (generation {})",
            flight.intent.request.method.name(),
            flight.intent.request.path,
            flight.generation
        );

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.send(flight.intent.request.clone()).await;
            let _ = tx.send(NavEvent::Responded { flight, result }).await;
        });
    }

    fn is_current(&self, flight: &InFlight) -> bool {
        match flight.intent.effect {
            IntentEffect::NewFrame { .. } => flight.generation == self.generation,
            IntentEffect::UpdateFrame { frame_id } => {
                flight.generation == self.refresh_generation
                    && self.store.with_state(|s| s.current_frame_id()) == Some(frame_id)
            }
        }
    }

    /// Clear the loading state owned by this intent, if it is still the
    /// latest one for its slot.
    fn release(&self, effect: IntentEffect, generation: u64) {
        match effect {
            IntentEffect::NewFrame { .. } if generation == self.generation => self
                .store
                .apply(FrameEvent::PhaseChanged(NavigationPhase::Idle)),
            IntentEffect::UpdateFrame { .. } if generation == self.refresh_generation => {
                self.store.apply(FrameEvent::RefreshSettled)
            }
            _ => {}
        }
    }

    fn handle(&mut self, ev: NavEvent) {
        match ev {
            NavEvent::UnloadConfirmed(flight) => {
                if self.is_current(&flight) {
                    self.issue(flight);
                } else {
                    let _ = flight.reply.send(Ok(NavigationOutcome::Superseded));
                }
            }

            NavEvent::UnloadAbandoned(flight) => {
                debug!(
                    "navigation to {} abandoned at the unload prompt",
                    flight.intent.request.path
                );
                if self.is_current(&flight) {
                    self.release(flight.intent.effect, flight.generation);
                }
                // Dropping the reply leaves the ticket abandoned.
            }

            NavEvent::Responded { flight, result } => {
                if self.is_current(&flight) {
                    self.apply_response(flight, result);
                } else {
                    debug!(
                        "dropping stale response for {} (generation {})",
                        flight.intent.request.path, flight.generation
                    );
                    self.release(flight.intent.effect, flight.generation);
                    let _ = flight.reply.send(Ok(NavigationOutcome::Superseded));
                }
            }
        }
    }

    fn apply_response(
        &mut self,
        flight: InFlight,
        result: Result<ProtocolResponse, ProtocolError>,
    ) {
        let InFlight {
            intent,
            generation,
            navigation,
            reply,
        } = flight;

        let outcome = match result {
            Err(e) => {
                error!("bad response for {}: {}", intent.request.path, e);
                self.release(intent.effect, generation);
                Err(NavigationError::Protocol(e))
            }

            Ok(ProtocolResponse::Reload) => {
                self.release(intent.effect, generation);
                self.reload();
                Ok(NavigationOutcome::Reloaded)
            }

            Ok(ProtocolResponse::Redirect { path }) => {
                debug!("{} redirected to {}", intent.request.path, path);
                if !intent.creates_frame() {
                    self.release(intent.effect, generation);
                    if navigation != self.generation || self.phase() != NavigationPhase::Idle {
                        debug!("refresh redirect lost to a newer navigation");
                        let _ = reply.send(Ok(NavigationOutcome::Superseded));
                        return;
                    }
                    // The refreshed page moved away; follow it as a navigation.
                    self.generation += 1;
                }
                self.store
                    .apply(FrameEvent::PhaseChanged(NavigationPhase::Redirecting));
                self.issue(InFlight {
                    intent: intent.redirected(path),
                    generation: self.generation,
                    navigation: self.generation,
                    reply,
                });
                return;
            }

            Ok(ProtocolResponse::ServerError) => {
                self.release(intent.effect, generation);
                self.fail(FailureKind::Server);
                Ok(NavigationOutcome::Failed(FailureKind::Server))
            }

            Ok(ProtocolResponse::NetworkError) => {
                self.release(intent.effect, generation);
                self.fail(FailureKind::Network);
                Ok(NavigationOutcome::Failed(FailureKind::Network))
            }

            Ok(ProtocolResponse::Render(payload)) => match intent.effect {
                IntentEffect::NewFrame { history } => {
                    let frame_id = self.commit_frame(intent.request.path, payload, history);
                    Ok(NavigationOutcome::Committed { frame_id })
                }
                IntentEffect::UpdateFrame { frame_id } => {
                    self.release(intent.effect, generation);
                    self.document.set_title(&payload.title);
                    self.store
                        .apply(FrameEvent::FrameUpdated { frame_id, payload });
                    Ok(NavigationOutcome::Updated { frame_id })
                }
            },
        };

        let _ = reply.send(outcome);
    }

    /// Commit a new frame, then update history. The entry is written only
    /// once the frame is in the store.
    fn commit_frame(
        &mut self,
        path: String,
        payload: RenderPayload,
        history: HistoryMode,
    ) -> FrameId {
        let frame_id = self.store.with_state(|s| s.next_frame_id);
        let title = payload.title.clone();
        self.store.apply(FrameEvent::FrameCommitted {
            path: path.clone(),
            payload,
        });
        debug!("committed frame {frame_id} at {path}");

        self.document.set_title(&title);
        let entry = HistoryEntry {
            frame_id: Some(frame_id),
            path,
        };
        match history {
            HistoryMode::Push => self.history.push(entry),
            HistoryMode::Replace => self.history.replace(entry),
            HistoryMode::Leave => {}
        }
        frame_id
    }

    fn fail(&self, kind: FailureKind) {
        let text = match kind {
            FailureKind::Server => SERVER_ERROR_TEXT,
            FailureKind::Network => NETWORK_ERROR_TEXT,
        };
        warn!("{kind:?} error while navigating");
        self.push_message(Message::error(text));
    }

    fn reload(&self) {
        info!("server requested a full reload");
        if let Err(e) = self.document.reload() {
            error!("document reload failed: {e}");
        }
    }
}
