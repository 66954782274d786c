pub mod app_core;
pub mod browser;
pub mod dirty_form;
pub mod domain;
pub mod history;
pub mod kernel;
pub mod ports;

pub use app_core::*;
pub use browser::{BrowserConfig, RenderPlan, ViewFn};
pub use dirty_form::{DirtyFormGuard, DirtyFormMarker, DirtySource, UnloadGate};
pub use domain::{NavigationPhase, NavigationState};
pub use history::{HistoryEntry, MemoryHistory};
pub use kernel::{
    FailureKind, NavigationController, NavigationError, NavigationOutcome, NavigationResult,
    NavigationTicket, TicketStatus,
};
pub use ports::*;
