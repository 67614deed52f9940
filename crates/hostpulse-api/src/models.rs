//! Wire models for the monitoring service's JSON API.
//!
//! Field names follow the service contract, which is uneven for historical
//! reasons: `/hosts/groups` speaks `address`/`label`, while `/add_ip` takes
//! the same data as `ip`/`name`. The renames are confined to the request
//! body types here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One monitored endpoint as listed under a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    /// Probe target (the identity key for chart/tab state).
    pub address: String,
    /// Display name; the service defaults it to the address.
    pub label: String,
}

/// One named group in the `/hosts/groups` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    /// Display position of the group tab, 1-based.
    pub order: u32,
    #[serde(default)]
    pub hosts: Vec<HostEntry>,
}

/// Response body of `GET /hosts/groups`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupsResponse {
    #[serde(default)]
    pub groups: HashMap<String, GroupEntry>,
}

/// Server-side reachability classification of a host at one sample.
///
/// The service computes this from recent probe loss; the client trusts it
/// verbatim. Unrecognized tags fold into [`HostStatus::Down`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostStatus {
    #[serde(rename = "UP")]
    Up,
    /// Partial packet loss in the recent window ("INSTAVEL" on the wire).
    #[serde(rename = "INSTAVEL")]
    Unstable,
    #[serde(rename = "DOWN", other)]
    Down,
}

/// One time-series sample for a host.
///
/// Samples arrive pre-ordered from the service; the client never sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Unix timestamp, seconds.
    pub ts: i64,
    /// Round-trip latency in milliseconds; `None` when all probes were lost.
    pub latency: Option<f64>,
    pub status: HostStatus,
}

/// Consolidated snapshot of `GET /data`: address → ordered sample history.
pub type DataSnapshot = HashMap<String, Vec<Sample>>;

// ── Request bodies ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct GroupNameBody<'a> {
    pub name: &'a str,
}

/// `/add_ip` body. The service predates the group model and still speaks
/// `ip`/`name` for this one endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct AddHostBody<'a> {
    #[serde(rename = "ip")]
    pub address: &'a str,
    #[serde(rename = "name")]
    pub label: &'a str,
    pub group: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RemoveHostBody<'a> {
    pub address: &'a str,
}

/// `/groups/add` acknowledgement. Only `status == "ok"` counts as accepted.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusAck {
    #[serde(default)]
    pub status: String,
    /// Optional human-readable rejection reason.
    #[serde(default)]
    pub msg: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn host_status_known_tags() {
        assert_eq!(
            serde_json::from_str::<HostStatus>("\"UP\"").unwrap(),
            HostStatus::Up
        );
        assert_eq!(
            serde_json::from_str::<HostStatus>("\"INSTAVEL\"").unwrap(),
            HostStatus::Unstable
        );
        assert_eq!(
            serde_json::from_str::<HostStatus>("\"DOWN\"").unwrap(),
            HostStatus::Down
        );
    }

    #[test]
    fn host_status_unknown_tag_is_down() {
        assert_eq!(
            serde_json::from_str::<HostStatus>("\"TIMEOUT\"").unwrap(),
            HostStatus::Down
        );
    }

    #[test]
    fn sample_null_latency() {
        let sample: Sample =
            serde_json::from_str(r#"{"ts": 1700000000, "latency": null, "status": "DOWN"}"#)
                .unwrap();
        assert_eq!(sample.latency, None);
        assert_eq!(sample.status, HostStatus::Down);
    }

    #[test]
    fn add_host_body_uses_legacy_keys() {
        let body = AddHostBody {
            address: "10.0.0.1",
            label: "gateway",
            group: "prod",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["ip"], "10.0.0.1");
        assert_eq!(json["name"], "gateway");
        assert_eq!(json["group"], "prod");
    }
}
