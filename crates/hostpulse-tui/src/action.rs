//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;

use hostpulse_core::{DataSnapshot, Group};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification shown in the status line.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Pending confirmation action.
///
/// Only group removal asks for confirmation; closing a host tab fires
/// immediately, matching how operators actually use the dashboard.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    RemoveGroup { name: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoveGroup { name } => {
                write!(f, "Remove group {name} and all its hosts?")
            }
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Session events (from the data bridge) ─────────────────────
    Seeded(Vec<Group>),
    SeedFailed(String),
    GroupAdded {
        name: String,
    },
    GroupRemoved {
        name: String,
    },
    HostAdded {
        address: String,
        label: String,
        group: String,
    },
    HostRemoved {
        address: String,
    },
    CommandFailed {
        description: String,
        error: String,
    },
    DataUpdated(DataSnapshot),

    // ── Validated user requests (dashboard → session) ─────────────
    SubmitAddGroup {
        name: String,
    },
    SubmitAddHost {
        address: String,
        label: String,
        group: String,
    },
    SubmitRemoveHost {
        address: String,
    },

    // ── Confirm dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Blocking notice (host cap) ────────────────────────────────
    ShowNotice(String),
    DismissNotice,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,
}
