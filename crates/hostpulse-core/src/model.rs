//! Domain model: groups of monitored hosts.
//!
//! The wire-side time-series types ([`Sample`](hostpulse_api::Sample),
//! [`HostStatus`](hostpulse_api::HostStatus)) are shared with the api crate
//! unchanged; only the configuration side gets domain types here.

use hostpulse_api::{GroupEntry, HostEntry};

/// A monitored network endpoint.
///
/// The address is the identity key for chart/tab state; the label is purely
/// for display and defaults to the address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub address: String,
    pub label: String,
}

impl Host {
    /// A host with an explicit label, falling back to the address when the
    /// label is empty.
    pub fn new(address: impl Into<String>, label: impl Into<String>) -> Self {
        let address = address.into();
        let label = label.into();
        let label = if label.trim().is_empty() {
            address.clone()
        } else {
            label
        };
        Self { address, label }
    }
}

impl From<HostEntry> for Host {
    fn from(entry: HostEntry) -> Self {
        Self::new(entry.address, entry.label)
    }
}

/// A named, ordered collection of monitored hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Unique, non-empty name.
    pub name: String,
    /// Display position of the group tab, 1-based.
    pub order: u32,
    /// Member hosts in server-held order.
    pub hosts: Vec<Host>,
}

impl Group {
    /// An empty group appended at position `order`.
    pub fn new(name: impl Into<String>, order: u32) -> Self {
        Self {
            name: name.into(),
            order,
            hosts: Vec::new(),
        }
    }

    /// Build from a `/hosts/groups` response entry.
    pub fn from_entry(name: String, entry: GroupEntry) -> Self {
        Self {
            name,
            order: entry.order,
            hosts: entry.hosts.into_iter().map(Host::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_label_defaults_to_address() {
        let host = Host::new("10.0.0.1", "");
        assert_eq!(host.label, "10.0.0.1");

        let host = Host::new("10.0.0.1", "  ");
        assert_eq!(host.label, "10.0.0.1");

        let host = Host::new("10.0.0.1", "gateway");
        assert_eq!(host.label, "gateway");
    }
}
