use std::sync::Arc;

use anyhow::{bail, Result};
use bridge_app_core::{
    BrowserConfig, DirtyFormGuard, DirtyFormMarker, FrameStore, HistoryPort, MemoryHistory,
    NavCommand, NavigateOptions, NavigationController, NavigationOutcome, NavigationTicket,
    ProtocolClient, RenderPlan, TicketStatus,
};
use bridge_core::{Frame, Props, ProtocolRequest, ProtocolResponse};
use bridge_infra::HttpProtocolClient;
use tracing::{debug, info};

use crate::commands::{Command, HELP};
use crate::terminal::{TerminalDocument, TerminalPrompt};

pub type Controller = NavigationController<HttpProtocolClient, MemoryHistory, TerminalDocument>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One loaded "page": controller, history and the form being edited.
pub struct Session {
    client: HttpProtocolClient,
    context_providers: Vec<String>,

    pub controller: Controller,
    pub history: Arc<MemoryHistory>,
    document: Arc<TerminalDocument>,
    guard: DirtyFormGuard,
    browser: BrowserConfig<String>,

    /// Unsaved edits of the form on screen.
    form: Option<DirtyFormMarker>,
    /// Navigation waiting at the leave-page prompt.
    parked: Option<NavigationTicket>,
}

impl Session {
    /// Load `path` the way a browser opens a page: one plain request whose
    /// payload seeds the controller.
    pub async fn open(
        client: HttpProtocolClient,
        path: &str,
        context_providers: Vec<String>,
    ) -> Result<Self> {
        info!("opening {path} on {}", client.base_url());
        let initial = client.send(ProtocolRequest::get(path)).await?;
        if matches!(initial, ProtocolResponse::Reload) {
            bail!("{path} is not served by a bridge application");
        }

        let history = Arc::new(MemoryHistory::new(path));
        let document = Arc::new(TerminalDocument::default());
        let guard = DirtyFormGuard::new(Arc::new(TerminalPrompt)).with_browser_unload(true);
        let mut browser = BrowserConfig::new().fallback(pretty_props);
        for name in &context_providers {
            browser = browser.context_provider(name.clone());
        }

        let controller = NavigationController::new(
            FrameStore::default(),
            guard.clone(),
            client.clone(),
            history.clone(),
            document.clone(),
        );

        let mut session = Self {
            client,
            context_providers,
            controller,
            history,
            document,
            guard,
            browser,
            form: None,
            parked: None,
        };

        match session.controller.bootstrap(initial, path) {
            Some(ticket) => session.drive(ticket, false).await?,
            None => session.show(),
        }
        Ok(session)
    }

    pub fn is_parked(&self) -> bool {
        self.parked.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.guard.is_dirty()
    }

    pub async fn execute(&mut self, cmd: Command) -> Result<Flow> {
        match cmd {
            Command::Go { path, force } => {
                let options = if force {
                    self.form = None;
                    NavigateOptions::default().skipping_dirty_check()
                } else {
                    NavigateOptions::default()
                };
                self.run(NavCommand::Navigate { path, options }).await?;
            }
            Command::Submit { path, data } => {
                // The submitted form no longer holds unsaved edits.
                self.form = None;
                self.run(NavCommand::SubmitForm { path, data }).await?;
            }
            Command::Replace { path } => match self.controller.state().current_frame_id() {
                Some(frame_id) => self.run(NavCommand::ReplacePath { frame_id, path }).await?,
                None => println!(":: Nothing loaded yet."),
            },
            Command::Refresh => self.run(NavCommand::RefreshProps).await?,
            Command::Back => {
                let location = self.history.back();
                self.pop_to(location).await?;
            }
            Command::Forward => {
                let location = self.history.forward();
                self.pop_to(location).await?;
            }
            Command::Dirty => {
                if self.form.is_none() {
                    self.form = Some(self.guard.marker());
                }
            }
            Command::Clean => self.form = None,
            Command::Confirm => match self.parked.take() {
                Some(ticket) => {
                    self.form = None;
                    self.guard.confirm_unload();
                    self.drive(ticket, false).await?;
                }
                None => println!(":: Nothing to confirm."),
            },
            Command::Stay => match self.parked.take() {
                Some(ticket) => {
                    self.guard.dismiss_unload();
                    self.drive(ticket, false).await?;
                }
                None => println!(":: Nothing to cancel."),
            },
            Command::Show => self.show(),
            Command::Help => println!("{HELP}"),
            Command::Quit => {
                if self.guard.should_block_browser_unload() {
                    println!(":: Discarding unsaved changes.");
                }
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    async fn pop_to(&mut self, location: Option<String>) -> Result<()> {
        match location {
            Some(location) => self.run(NavCommand::PopState { location }).await,
            None => {
                println!(":: No entry in that direction.");
                Ok(())
            }
        }
    }

    async fn run(&mut self, cmd: NavCommand) -> Result<()> {
        let guarded = match &cmd {
            NavCommand::Navigate { options, .. } => !options.skip_dirty_form_check,
            NavCommand::SubmitForm { .. } | NavCommand::PopState { .. } => true,
            NavCommand::ReplacePath { .. } | NavCommand::RefreshProps => false,
        };
        match self.controller.dispatch(cmd) {
            Some(ticket) => self.drive(ticket, guarded).await,
            None => {
                self.show();
                Ok(())
            }
        }
    }

    /// Run a navigation to completion, or park it when it is waiting at the
    /// leave-page prompt.
    async fn drive(&mut self, mut ticket: NavigationTicket, guarded: bool) -> Result<()> {
        if guarded {
            // A newer navigation takes over whatever was waiting.
            self.parked = None;
        }
        self.controller.tick();
        if guarded && self.guard.is_prompting() && ticket.status() == TicketStatus::Pending {
            self.parked = Some(ticket);
            return Ok(());
        }

        match self.controller.settle(ticket).await {
            Some(Ok(NavigationOutcome::Reloaded)) => {}
            Some(Ok(outcome)) => {
                debug!("navigation finished: {outcome:?}");
                self.show();
            }
            Some(Err(e)) => return Err(e.into()),
            None => println!(":: Stayed on the page."),
        }

        if self.document.take_reload() {
            self.reload().await?;
        }
        Ok(())
    }

    /// Full reload: everything in memory is thrown away and the current
    /// location is loaded from scratch.
    async fn reload(&mut self) -> Result<()> {
        let location = self.history.location();
        println!(":: Reloading {location}");
        let fresh = Box::pin(Session::open(
            self.client.clone(),
            &location,
            self.context_providers.clone(),
        ))
        .await?;
        *self = fresh;
        Ok(())
    }

    pub fn show(&self) {
        let state = self.controller.state();
        let Some(frame) = &state.current_frame else {
            println!(":: Loading...");
            print_messages(&state.messages);
            return;
        };

        println!("#{} {} [{}]", frame.id, frame.path, frame.view);
        match self.browser.render(frame) {
            RenderPlan::View {
                element, contexts, ..
            } => {
                for (name, value) in contexts {
                    println!("  @{name} = {value}");
                }
                println!("{element}");
            }
            RenderPlan::UnknownView { name } => println!(":: No view registered for {name}"),
        }
        print_messages(&state.messages);
    }

    pub fn current_frame(&self) -> Option<Frame> {
        self.controller.current_frame()
    }
}

fn pretty_props(props: &Props) -> String {
    serde_json::to_string_pretty(props).unwrap_or_default()
}

fn print_messages(messages: &[bridge_core::Message]) {
    for message in messages {
        println!("  [{:?}] {}", message.level, message.as_str());
    }
}
