//! Data bridge — connects [`Session`] events to TUI actions.
//!
//! Runs as a background task: drains the session's event stream and
//! forwards each event as an [`Action`] through the TUI's action channel.
//! Pure plumbing; the dashboard decides what each event means for state.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use hostpulse_core::SessionEvent;

use crate::action::{Action, Notification};

/// Forward session events into the action loop until cancelled or the
/// session's event stream closes.
pub async fn run_data_bridge(
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = events.recv() => {
                let Some(event) = event else { break };
                event
            }
        };

        let action = match event {
            SessionEvent::Seeded(groups) => Action::Seeded(groups),
            SessionEvent::SeedFailed(reason) => Action::SeedFailed(reason),
            SessionEvent::GroupAdded { name } => Action::GroupAdded { name },
            SessionEvent::GroupRemoved { name } => Action::GroupRemoved { name },
            SessionEvent::HostAdded {
                address,
                label,
                group,
            } => Action::HostAdded {
                address,
                label,
                group,
            },
            SessionEvent::HostRemoved { address } => Action::HostRemoved { address },
            SessionEvent::CommandFailed { description, error } => {
                // Surface the failure; local state was never touched.
                let _ = action_tx.send(Action::Notify(Notification::error(format!(
                    "{description}: {error}"
                ))));
                Action::CommandFailed { description, error }
            }
            SessionEvent::DataUpdated(data) => Action::DataUpdated(data),
        };

        if action_tx.send(action).is_err() {
            break;
        }
    }

    debug!("data bridge shut down");
}
