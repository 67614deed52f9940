//! State-and-sync core of the hostpulse dashboard.
//!
//! This crate owns everything between the wire (`hostpulse-api`) and the
//! rendering surface:
//!
//! - **[`DashboardState`]** — the single explicit state object for the
//!   dashboard: groups and their hosts, the active selection, the visual
//!   host-tab order, and per-host sample series. Every mutation is a pure
//!   transition returning a typed outcome, so the whole state machine is
//!   unit-testable without a terminal.
//!
//! - **[`Session`]** — service synchronization: seeds the state from
//!   `GET /hosts/groups`, runs the fixed-cadence polling task against
//!   `GET /data`, and processes configuration commands through a serialized
//!   queue. Local state changes only after the service confirms a mutation;
//!   a failed call surfaces an error event and changes nothing.
//!
//! - **[`Command`] / [`SessionEvent`]** — typed requests into the session
//!   and the confirmations/data flowing back out, consumed by the TUI's
//!   data bridge.

pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod state;

pub use config::SessionConfig;
pub use error::CoreError;
pub use model::{Group, Host};
pub use session::{Command, Session, SessionEvent};
pub use state::{AddGroupCheck, AddHostCheck, DashboardState};

// Wire types shared verbatim with the api crate.
pub use hostpulse_api::{DataSnapshot, HostStatus, Sample};
