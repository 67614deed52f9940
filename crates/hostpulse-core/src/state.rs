//! The dashboard state machine.
//!
//! One explicit state object owns what the first iteration of this dashboard
//! scattered across module-level maps: the group model, the active
//! selection, the visual host-tab order, and the per-host sample series.
//! Every mutation is a pure transition returning a typed outcome; rendering
//! is a separate projection pass, so all of this is testable without a
//! terminal.
//!
//! Two orders coexist deliberately: each [`Group`] keeps its hosts in
//! server-held order, while `tab_order` holds the visual order of the host
//! tab strip. Drag-reordering touches only `tab_order` — it is never
//! persisted, and reseeding from the service restores server order.

use std::collections::HashMap;

use indexmap::IndexMap;

use hostpulse_api::{DataSnapshot, HostStatus, Sample};

use crate::config::{DEFAULT_HOST_LIMIT, DEFAULT_RETENTION};
use crate::model::{Group, Host};

/// Outcome of validating a group-add request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddGroupCheck {
    /// Name trimmed and ready to send to the service.
    Accepted(String),
    EmptyName,
    Duplicate,
}

/// Outcome of validating a host-add request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddHostCheck {
    /// Address and label trimmed and ready to send to the service.
    Accepted { address: String, label: String },
    EmptyAddress,
    /// A tab/chart already exists for this address.
    AlreadyDisplayed,
    NoActiveGroup,
    /// The displayed-host cap is reached. The UI must surface a blocking
    /// notice for this case; the other rejections stay silent.
    LimitReached,
}

/// Client-side state of the whole dashboard.
///
/// Mutations come in two flavors: local-only transitions (selection, drag
/// reorder, poll application) applied directly, and configuration
/// transitions (`confirm_*`) applied only once the service has acknowledged
/// the corresponding command.
#[derive(Debug)]
pub struct DashboardState {
    /// Groups keyed by name, in display order.
    groups: IndexMap<String, Group>,
    active_group: Option<String>,
    active_host: Option<String>,
    /// Visual order of displayed host addresses (the host tab strip).
    tab_order: Vec<String>,
    /// Sample history per displayed address, bounded by `retention`.
    series: HashMap<String, Vec<Sample>>,
    /// Address currently being dragged, at most one dashboard-wide.
    dragged: Option<String>,
    host_limit: usize,
    retention: usize,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::with_limits(DEFAULT_HOST_LIMIT, DEFAULT_RETENTION)
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(host_limit: usize, retention: usize) -> Self {
        Self {
            groups: IndexMap::new(),
            active_group: None,
            active_host: None,
            tab_order: Vec::new(),
            series: HashMap::new(),
            dragged: None,
            host_limit,
            retention,
        }
    }

    // ── Seeding ───────────────────────────────────────────────────────

    /// Replace the group model with a fresh service snapshot.
    ///
    /// Resets all selection and displayed-tab state; groups are ordered by
    /// their server-held `order`.
    pub fn seed(&mut self, mut groups: Vec<Group>) {
        groups.sort_by_key(|g| g.order);
        self.groups = groups.into_iter().map(|g| (g.name.clone(), g)).collect();
        self.active_group = None;
        self.active_host = None;
        self.tab_order.clear();
        self.series.clear();
        self.dragged = None;
    }

    // ── Group configuration ───────────────────────────────────────────

    /// Validate a group-add request. Rejections are silent by design.
    pub fn check_add_group(&self, raw_name: &str) -> AddGroupCheck {
        let name = raw_name.trim();
        if name.is_empty() {
            AddGroupCheck::EmptyName
        } else if self.groups.contains_key(name) {
            AddGroupCheck::Duplicate
        } else {
            AddGroupCheck::Accepted(name.to_owned())
        }
    }

    /// Insert a group the service has confirmed.
    #[allow(clippy::cast_possible_truncation)]
    pub fn confirm_add_group(&mut self, name: &str) {
        if self.groups.contains_key(name) {
            return;
        }
        let order = self.groups.len() as u32 + 1;
        self.groups.insert(name.to_owned(), Group::new(name, order));
    }

    /// Delete a group the service has confirmed removed.
    ///
    /// If the group was active, clears the active selection and all
    /// displayed tab/chart state.
    pub fn confirm_remove_group(&mut self, name: &str) -> bool {
        let removed = self.groups.shift_remove(name).is_some();
        if removed && self.active_group.as_deref() == Some(name) {
            self.active_group = None;
            self.active_host = None;
            self.tab_order.clear();
            self.series.clear();
            self.dragged = None;
        }
        removed
    }

    // ── Host configuration ────────────────────────────────────────────

    /// Validate a host-add request against the displayed set.
    ///
    /// Uniqueness is checked only against currently displayed hosts, never
    /// globally across groups (the historical behavior, kept as-is).
    pub fn check_add_host(&self, raw_address: &str, raw_label: &str) -> AddHostCheck {
        let address = raw_address.trim();
        if address.is_empty() {
            return AddHostCheck::EmptyAddress;
        }
        if self.tab_order.iter().any(|a| a == address) {
            return AddHostCheck::AlreadyDisplayed;
        }
        if self.active_group.is_none() {
            return AddHostCheck::NoActiveGroup;
        }
        if self.tab_order.len() >= self.host_limit {
            return AddHostCheck::LimitReached;
        }
        AddHostCheck::Accepted {
            address: address.to_owned(),
            label: raw_label.trim().to_owned(),
        }
    }

    /// Append a host the service has confirmed into `group`.
    ///
    /// The tab/chart is instantiated (and activated) only when that group is
    /// still the active one — a confirmation can arrive after the operator
    /// switched or removed the group, in which case only the model updates.
    pub fn confirm_add_host(&mut self, address: &str, label: &str, group: &str) -> bool {
        let Some(entry) = self.groups.get_mut(group) else {
            return false;
        };
        let host = Host::new(address, label);
        if !entry.hosts.iter().any(|h| h.address == address) {
            entry.hosts.push(host);
        }

        if self.active_group.as_deref() == Some(group)
            && !self.tab_order.iter().any(|a| a == address)
            && self.tab_order.len() < self.host_limit
        {
            self.tab_order.push(address.to_owned());
            self.series.insert(address.to_owned(), Vec::new());
            self.active_host = Some(address.to_owned());
        }
        true
    }

    /// Remove a host the service has confirmed removed.
    ///
    /// The address disappears from **every** group's host list, not just the
    /// active one. If it was the active tab, selection falls back to the
    /// first remaining tab.
    pub fn confirm_remove_host(&mut self, address: &str) {
        for group in self.groups.values_mut() {
            group.hosts.retain(|h| h.address != address);
        }

        let was_displayed = self.tab_order.iter().any(|a| a == address);
        if !was_displayed {
            return;
        }
        self.tab_order.retain(|a| a != address);
        self.series.remove(address);
        if self.dragged.as_deref() == Some(address) {
            self.dragged = None;
        }
        if self.active_host.as_deref() == Some(address) {
            self.active_host = self.tab_order.first().cloned();
        }
    }

    // ── Selection ─────────────────────────────────────────────────────

    /// Activate a group: tear down all host tabs/charts and repopulate from
    /// the group's host list in server order, activating the first host.
    pub fn activate_group(&mut self, name: &str) -> bool {
        let Some(group) = self.groups.get(name) else {
            return false;
        };

        self.tab_order.clear();
        self.series.clear();
        self.dragged = None;
        for host in &group.hosts {
            if self.tab_order.iter().any(|a| a == &host.address) {
                continue;
            }
            self.tab_order.push(host.address.clone());
            self.series.insert(host.address.clone(), Vec::new());
        }

        self.active_group = Some(name.to_owned());
        self.active_host = self.tab_order.first().cloned();
        true
    }

    /// Activate a host tab. Only displayed hosts are selectable.
    pub fn activate_host(&mut self, address: &str) -> bool {
        if self.tab_order.iter().any(|a| a == address) {
            self.active_host = Some(address.to_owned());
            true
        } else {
            false
        }
    }

    // ── Drag reorder ──────────────────────────────────────────────────

    /// Start dragging a host tab. A second call replaces the slot — at most
    /// one drag gesture exists dashboard-wide.
    pub fn begin_drag(&mut self, address: &str) -> bool {
        if self.tab_order.iter().any(|a| a == address) {
            self.dragged = Some(address.to_owned());
            true
        } else {
            false
        }
    }

    pub fn cancel_drag(&mut self) {
        self.dragged = None;
    }

    pub fn dragged(&self) -> Option<&str> {
        self.dragged.as_deref()
    }

    /// Drop the dragged tab onto `target`: the dragged tab is re-inserted at
    /// the target's prior index, landing after it when moving forward and
    /// before it when moving backward. Visual only — group host lists keep
    /// server order.
    pub fn drop_on(&mut self, target: &str) -> bool {
        let Some(dragged) = self.dragged.take() else {
            return false;
        };
        if dragged == target {
            return false;
        }
        let Some(from) = self.tab_order.iter().position(|a| a == &dragged) else {
            return false;
        };
        let Some(to) = self.tab_order.iter().position(|a| a == target) else {
            return false;
        };
        self.tab_order.remove(from);
        self.tab_order.insert(to, dragged);
        true
    }

    // ── Polling ───────────────────────────────────────────────────────

    /// Apply a poll snapshot: for every address with a live chart, the
    /// series is replaced wholesale and truncated to the retention window.
    /// Addresses without a live chart are ignored — poll data never creates
    /// tabs.
    pub fn apply_poll(&mut self, data: DataSnapshot) {
        for (address, mut samples) in data {
            let Some(slot) = self.series.get_mut(&address) else {
                continue;
            };
            if samples.len() > self.retention {
                samples.drain(..samples.len() - self.retention);
            }
            *slot = samples;
        }
    }

    /// Status classification for a host's tab, from the last sample only.
    /// `None` until the first poll lands.
    pub fn host_status(&self, address: &str) -> Option<HostStatus> {
        self.series
            .get(address)?
            .last()
            .map(|sample| sample.status)
    }

    // ── Projections ───────────────────────────────────────────────────

    /// Groups in display order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn active_group(&self) -> Option<&str> {
        self.active_group.as_deref()
    }

    pub fn active_host(&self) -> Option<&str> {
        self.active_host.as_deref()
    }

    /// Displayed hosts in visual (tab strip) order.
    pub fn displayed_hosts(&self) -> Vec<Host> {
        self.tab_order
            .iter()
            .map(|address| {
                self.label_of(address)
                    .map_or_else(|| Host::new(address.clone(), ""), |label| {
                        Host::new(address.clone(), label)
                    })
            })
            .collect()
    }

    pub fn displayed_count(&self) -> usize {
        self.tab_order.len()
    }

    /// Sample history for a displayed host.
    pub fn series(&self, address: &str) -> Option<&[Sample]> {
        self.series.get(address).map(Vec::as_slice)
    }

    fn label_of(&self, address: &str) -> Option<String> {
        let group = self.groups.get(self.active_group.as_deref()?)?;
        group
            .hosts
            .iter()
            .find(|h| h.address == address)
            .map(|h| h.label.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::{assert_eq, assert_ne};

    use super::*;

    fn sample(ts: i64, latency: Option<f64>, status: HostStatus) -> Sample {
        Sample {
            ts,
            latency,
            status,
        }
    }

    /// State seeded with "prod" (two hosts) and "lab" (one host), no
    /// selection yet.
    fn seeded() -> DashboardState {
        let mut state = DashboardState::new();
        state.seed(vec![
            Group {
                name: "prod".into(),
                order: 1,
                hosts: vec![
                    Host::new("10.0.0.1", "gateway"),
                    Host::new("10.0.0.2", "dns"),
                ],
            },
            Group {
                name: "lab".into(),
                order: 2,
                hosts: vec![Host::new("192.168.0.5", "bench")],
            },
        ]);
        state
    }

    #[test]
    fn seed_orders_groups_by_server_order() {
        let mut state = DashboardState::new();
        state.seed(vec![
            Group::new("second", 2),
            Group::new("first", 1),
            Group::new("third", 3),
        ]);
        let names: Vec<&str> = state.groups().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn seed_then_activate_reproduces_server_order() {
        let mut state = seeded();
        assert!(state.activate_group("prod"));

        let displayed: Vec<String> = state
            .displayed_hosts()
            .into_iter()
            .map(|h| h.address)
            .collect();
        assert_eq!(displayed, ["10.0.0.1", "10.0.0.2"]);
        assert_eq!(state.active_host(), Some("10.0.0.1"));
    }

    #[test]
    fn add_host_then_duplicate_is_rejected() {
        let mut state = seeded();
        state.activate_group("prod");

        state.confirm_add_host("10.0.0.3", "cache", "prod");
        let prod = state.group("prod").unwrap();
        assert_eq!(
            prod.hosts.iter().filter(|h| h.address == "10.0.0.3").count(),
            1
        );

        // Second add of the same address: rejected before any command is sent.
        assert_eq!(
            state.check_add_host("10.0.0.3", "cache"),
            AddHostCheck::AlreadyDisplayed
        );
        let count_before = state.displayed_count();
        assert_eq!(state.displayed_count(), count_before);
    }

    #[test]
    fn add_host_validation_order() {
        let mut state = seeded();
        assert_eq!(state.check_add_host("  ", "x"), AddHostCheck::EmptyAddress);
        // No active group yet.
        assert_eq!(
            state.check_add_host("10.9.9.9", ""),
            AddHostCheck::NoActiveGroup
        );
        state.activate_group("prod");
        assert!(matches!(
            state.check_add_host(" 10.9.9.9 ", " edge "),
            AddHostCheck::Accepted { ref address, ref label }
                if address == "10.9.9.9" && label == "edge"
        ));
    }

    #[test]
    fn new_host_tab_becomes_active() {
        let mut state = seeded();
        state.activate_group("prod");
        state.confirm_add_host("10.0.0.3", "cache", "prod");
        assert_eq!(state.active_host(), Some("10.0.0.3"));
    }

    #[test]
    fn stale_add_confirmation_does_not_create_tab() {
        let mut state = seeded();
        state.activate_group("prod");
        // Operator switched groups while the add was in flight.
        state.activate_group("lab");
        state.confirm_add_host("10.0.0.3", "cache", "prod");

        assert_eq!(state.group("prod").unwrap().hosts.len(), 3);
        assert!(!state.displayed_hosts().iter().any(|h| h.address == "10.0.0.3"));
        assert_eq!(state.active_host(), Some("192.168.0.5"));
    }

    #[test]
    fn remove_host_strips_every_group() {
        let mut state = DashboardState::new();
        // Same address configured in two groups (cross-group duplicates are
        // representable and unvalidated).
        state.seed(vec![
            Group {
                name: "a".into(),
                order: 1,
                hosts: vec![Host::new("10.0.0.1", "one"), Host::new("10.0.0.2", "two")],
            },
            Group {
                name: "b".into(),
                order: 2,
                hosts: vec![Host::new("10.0.0.1", "one-again")],
            },
        ]);
        state.activate_group("a");

        state.confirm_remove_host("10.0.0.1");

        assert!(!state.group("a").unwrap().hosts.iter().any(|h| h.address == "10.0.0.1"));
        assert!(state.group("b").unwrap().hosts.is_empty());
        // Active selection fell back to the first remaining tab.
        assert_eq!(state.active_host(), Some("10.0.0.2"));
    }

    #[test]
    fn host_limit_enforced_at_add_time() {
        let mut state = DashboardState::with_limits(60, DEFAULT_RETENTION);
        state.seed(vec![Group::new("prod", 1)]);
        state.activate_group("prod");

        for i in 0..59 {
            let address = format!("10.0.1.{i}");
            assert!(matches!(
                state.check_add_host(&address, ""),
                AddHostCheck::Accepted { .. }
            ));
            state.confirm_add_host(&address, "", "prod");
        }
        assert_eq!(state.displayed_count(), 59);

        // The 60th add succeeds…
        assert!(matches!(
            state.check_add_host("10.0.2.1", ""),
            AddHostCheck::Accepted { .. }
        ));
        state.confirm_add_host("10.0.2.1", "", "prod");
        assert_eq!(state.displayed_count(), 60);

        // …and the 61st is rejected with the blocking-notice outcome.
        assert_eq!(
            state.check_add_host("10.0.2.2", ""),
            AddHostCheck::LimitReached
        );
        assert_eq!(state.displayed_count(), 60);
    }

    #[test]
    fn group_switch_leaves_no_orphan_tabs() {
        let mut state = seeded();
        state.activate_group("prod");
        assert_eq!(state.displayed_count(), 2);

        state.activate_group("lab");
        let displayed: Vec<String> = state
            .displayed_hosts()
            .into_iter()
            .map(|h| h.address)
            .collect();
        assert_eq!(displayed, ["192.168.0.5"]);
        assert!(state.series("10.0.0.1").is_none());
        assert!(state.series("10.0.0.2").is_none());
        assert_eq!(state.active_host(), Some("192.168.0.5"));
    }

    #[test]
    fn removing_active_group_clears_all_display_state() {
        let mut state = seeded();
        state.activate_group("prod");

        assert!(state.confirm_remove_group("prod"));

        assert_eq!(state.active_group(), None);
        assert_eq!(state.active_host(), None);
        assert_eq!(state.displayed_count(), 0);
        assert!(state.groups().any(|g| g.name == "lab"));
    }

    #[test]
    fn empty_or_duplicate_group_names_rejected() {
        let state = seeded();
        assert_eq!(state.check_add_group("   "), AddGroupCheck::EmptyName);
        assert_eq!(state.check_add_group("prod"), AddGroupCheck::Duplicate);
        assert_eq!(
            state.check_add_group("  edge  "),
            AddGroupCheck::Accepted("edge".into())
        );
    }

    #[test]
    fn confirmed_group_gets_next_order() {
        let mut state = seeded();
        state.confirm_add_group("edge");
        assert_eq!(state.group("edge").unwrap().order, 3);
    }

    #[test]
    fn poll_replaces_series_and_classifies_from_last_sample() {
        let mut state = seeded();
        state.activate_group("prod");

        let mut data = DataSnapshot::new();
        data.insert(
            "10.0.0.1".into(),
            vec![
                sample(100, Some(10.0), HostStatus::Up),
                sample(102, Some(80.0), HostStatus::Unstable),
            ],
        );
        state.apply_poll(data);

        // Degraded, and neither healthy nor down.
        assert_eq!(state.host_status("10.0.0.1"), Some(HostStatus::Unstable));
        assert_ne!(state.host_status("10.0.0.1"), Some(HostStatus::Up));
        assert_ne!(state.host_status("10.0.0.1"), Some(HostStatus::Down));
        assert_eq!(state.series("10.0.0.1").unwrap().len(), 2);
    }

    #[test]
    fn poll_ignores_addresses_without_a_live_chart() {
        let mut state = seeded();
        state.activate_group("lab");

        let mut data = DataSnapshot::new();
        // Known to the service, but not displayed: no implicit tab creation.
        data.insert("10.0.0.1".into(), vec![sample(100, Some(1.0), HostStatus::Up)]);
        state.apply_poll(data);

        assert_eq!(state.displayed_count(), 1);
        assert!(state.series("10.0.0.1").is_none());
    }

    #[test]
    fn poll_truncates_to_retention_window() {
        let mut state = DashboardState::with_limits(DEFAULT_HOST_LIMIT, 5);
        state.seed(vec![Group {
            name: "prod".into(),
            order: 1,
            hosts: vec![Host::new("10.0.0.1", "")],
        }]);
        state.activate_group("prod");

        let mut data = DataSnapshot::new();
        data.insert(
            "10.0.0.1".into(),
            (0..12).map(|i| sample(i, Some(1.0), HostStatus::Up)).collect(),
        );
        state.apply_poll(data);

        let series = state.series("10.0.0.1").unwrap();
        assert_eq!(series.len(), 5);
        // Oldest samples dropped, newest kept.
        assert_eq!(series.first().unwrap().ts, 7);
        assert_eq!(series.last().unwrap().ts, 11);
    }

    #[test]
    fn drag_forward_lands_after_target() {
        let mut state = DashboardState::new();
        state.seed(vec![Group {
            name: "g".into(),
            order: 1,
            hosts: vec![
                Host::new("a", ""),
                Host::new("b", ""),
                Host::new("c", ""),
                Host::new("d", ""),
            ],
        }]);
        state.activate_group("g");

        assert!(state.begin_drag("a"));
        assert!(state.drop_on("c"));

        let order: Vec<String> = state
            .displayed_hosts()
            .into_iter()
            .map(|h| h.address)
            .collect();
        assert_eq!(order, ["b", "c", "a", "d"]);
        assert_eq!(state.dragged(), None);
    }

    #[test]
    fn drag_backward_lands_before_target() {
        let mut state = DashboardState::new();
        state.seed(vec![Group {
            name: "g".into(),
            order: 1,
            hosts: vec![
                Host::new("a", ""),
                Host::new("b", ""),
                Host::new("c", ""),
                Host::new("d", ""),
            ],
        }]);
        state.activate_group("g");

        assert!(state.begin_drag("d"));
        assert!(state.drop_on("b"));

        let order: Vec<String> = state
            .displayed_hosts()
            .into_iter()
            .map(|h| h.address)
            .collect();
        assert_eq!(order, ["a", "d", "b", "c"]);
    }

    #[test]
    fn drag_reorder_is_visual_only() {
        let mut state = seeded();
        state.activate_group("prod");

        state.begin_drag("10.0.0.1");
        state.drop_on("10.0.0.2");

        // The tab strip reordered…
        let displayed: Vec<String> = state
            .displayed_hosts()
            .into_iter()
            .map(|h| h.address)
            .collect();
        assert_eq!(displayed, ["10.0.0.2", "10.0.0.1"]);

        // …but the group model (what a reseed would serve back) did not.
        let configured: Vec<&str> = state
            .group("prod")
            .unwrap()
            .hosts
            .iter()
            .map(|h| h.address.as_str())
            .collect();
        assert_eq!(configured, ["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn drop_without_drag_or_onto_self_is_noop() {
        let mut state = seeded();
        state.activate_group("prod");

        assert!(!state.drop_on("10.0.0.2"));

        state.begin_drag("10.0.0.1");
        assert!(!state.drop_on("10.0.0.1"));
        // The gesture is consumed either way.
        assert_eq!(state.dragged(), None);
    }
}
