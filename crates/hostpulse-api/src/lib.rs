//! Async client for the hostpulse monitoring service.
//!
//! The service probes configured hosts server-side and exposes a small JSON
//! API: group/host configuration (`/hosts/groups`, `/groups/add`,
//! `/groups/remove`, `/add_ip`, `/remove_ip`) and a consolidated
//! time-series snapshot (`/data`). This crate covers transport mechanics and
//! wire models only — state handling lives in `hostpulse-core`.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::MonitorClient;
pub use error::Error;
pub use models::{DataSnapshot, GroupEntry, GroupsResponse, HostEntry, HostStatus, Sample};
pub use transport::TransportConfig;
