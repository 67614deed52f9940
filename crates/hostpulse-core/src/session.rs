// ── Session abstraction ──
//
// Service synchronization for the dashboard: initial group seeding,
// fixed-cadence polling, and serialized configuration commands. The UI
// never mutates configuration state directly; it queues a Command and
// applies the change when the matching SessionEvent comes back.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use hostpulse_api::{DataSnapshot, MonitorClient, TransportConfig};

use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::model::Group;

const COMMAND_CHANNEL_SIZE: usize = 64;

// ── Command / SessionEvent ───────────────────────────────────────

/// A configuration mutation to run against the service.
///
/// Commands are processed strictly in submission order by a single
/// processor task, so an add followed by a remove of the same entity
/// resolves deterministically even though each is an HTTP round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddGroup {
        name: String,
    },
    RemoveGroup {
        name: String,
    },
    AddHost {
        address: String,
        label: String,
        group: String,
    },
    RemoveHost {
        address: String,
    },
}

impl Command {
    /// Short human description, used in failure events.
    fn describe(&self) -> String {
        match self {
            Self::AddGroup { name } => format!("add group '{name}'"),
            Self::RemoveGroup { name } => format!("remove group '{name}'"),
            Self::AddHost { address, group, .. } => {
                format!("add host {address} to '{group}'")
            }
            Self::RemoveHost { address } => format!("remove host {address}"),
        }
    }
}

/// Events flowing out of the session, consumed by the UI's data bridge.
///
/// Every `Command` produces exactly one confirmation or one
/// [`CommandFailed`](SessionEvent::CommandFailed); poll results arrive as
/// [`DataUpdated`](SessionEvent::DataUpdated) at the polling cadence.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Initial group snapshot fetched at startup.
    Seeded(Vec<Group>),
    /// The startup fetch failed; the dashboard starts empty.
    SeedFailed(String),
    GroupAdded { name: String },
    GroupRemoved { name: String },
    HostAdded {
        address: String,
        label: String,
        group: String,
    },
    HostRemoved { address: String },
    /// A command was rejected or the call failed. Local state is unchanged.
    CommandFailed { description: String, error: String },
    /// Fresh time-series snapshot from a poll tick.
    DataUpdated(DataSnapshot),
}

// ── Session ──────────────────────────────────────────────────────

/// Handle to the service-synchronization tasks.
///
/// Cheaply cloneable via `Arc<SessionInner>`. [`new()`](Self::new) builds
/// the HTTP client and the event channel; [`start()`](Self::start) spawns
/// the seed, command-processor, and polling tasks.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: SessionConfig,
    client: MonitorClient,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    command_tx: mpsc::Sender<Command>,
    command_rx: Mutex<Option<mpsc::Receiver<Command>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Session {
    /// Create a session for the service in `config`. Does not touch the
    /// network -- call [`start()`](Self::start) to begin synchronizing.
    ///
    /// Returns the session and the receiving end of its event stream.
    pub fn new(
        config: SessionConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SessionEvent>), CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = MonitorClient::new(config.url.clone(), &transport)?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        let session = Self {
            inner: Arc::new(SessionInner {
                config,
                client,
                event_tx,
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        };
        Ok((session, event_rx))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Spawn the background tasks: one-shot seed, the serialized command
    /// processor, and the polling loop.
    pub async fn start(&self) {
        let mut handles = self.inner.task_handles.lock().await;

        handles.push(tokio::spawn(seed_task(self.clone())));

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            handles.push(tokio::spawn(command_processor_task(self.clone(), rx)));
        }

        handles.push(tokio::spawn(poll_task(self.clone())));
    }

    /// Queue a configuration command.
    ///
    /// Returns as soon as the command is enqueued; the outcome arrives on
    /// the event stream.
    pub async fn execute(&self, cmd: Command) -> Result<(), CoreError> {
        self.inner
            .command_tx
            .send(cmd)
            .await
            .map_err(|_| CoreError::SessionClosed)
    }

    /// Cancel and join all background tasks.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("session shut down");
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.inner.event_tx.send(event);
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Fetch the initial group snapshot once and emit it.
async fn seed_task(session: Session) {
    let result = tokio::select! {
        biased;
        () = session.inner.cancel.cancelled() => return,
        res = session.inner.client.fetch_groups() => res,
    };

    match result {
        Ok(response) => {
            let groups: Vec<Group> = response
                .groups
                .into_iter()
                .map(|(name, entry)| Group::from_entry(name, entry))
                .collect();
            debug!(groups = groups.len(), "seeded group configuration");
            session.emit(SessionEvent::Seeded(groups));
        }
        Err(e) => {
            warn!(error = %e, "initial group fetch failed");
            session.emit(SessionEvent::SeedFailed(e.to_string()));
        }
    }
}

/// Poll `GET /data` at the configured cadence.
///
/// Each tick spawns a detached fetch so a slow or hung request never
/// delays the next tick; snapshots may consequently arrive out of order,
/// which the state layer tolerates by replacing series wholesale.
async fn poll_task(session: Session) {
    let mut interval = tokio::time::interval(session.inner.config.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = session.inner.cancel.cancelled() => break,
            _ = interval.tick() => {
                let session = session.clone();
                tokio::spawn(async move {
                    match session.inner.client.fetch_data().await {
                        Ok(data) => session.emit(SessionEvent::DataUpdated(data)),
                        Err(e) if e.is_transient() => {
                            debug!(error = %e, "poll tick failed");
                        }
                        Err(e) => {
                            warn!(error = %e, "poll tick failed");
                        }
                    }
                });
            }
        }
    }
}

/// Process commands strictly in submission order.
async fn command_processor_task(session: Session, mut rx: mpsc::Receiver<Command>) {
    let cancel = session.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            cmd = rx.recv() => {
                let Some(cmd) = cmd else { break };
                let event = route_command(&session, cmd).await;
                session.emit(event);
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────

/// Run one command against the service, mapping the outcome to the event
/// that will drive the state update.
async fn route_command(session: &Session, cmd: Command) -> SessionEvent {
    let client = &session.inner.client;
    let description = cmd.describe();

    let result = match &cmd {
        Command::AddGroup { name } => client.add_group(name).await,
        Command::RemoveGroup { name } => client.remove_group(name).await,
        Command::AddHost {
            address,
            label,
            group,
        } => client.add_host(address, label, group).await,
        Command::RemoveHost { address } => client.remove_host(address).await,
    };

    match result {
        Ok(()) => {
            debug!(command = %description, "command confirmed");
            match cmd {
                Command::AddGroup { name } => SessionEvent::GroupAdded { name },
                Command::RemoveGroup { name } => SessionEvent::GroupRemoved { name },
                Command::AddHost {
                    address,
                    label,
                    group,
                } => SessionEvent::HostAdded {
                    address,
                    label,
                    group,
                },
                Command::RemoveHost { address } => SessionEvent::HostRemoved { address },
            }
        }
        Err(e) => {
            warn!(command = %description, error = %e, "command failed");
            SessionEvent::CommandFailed {
                description,
                error: e.to_string(),
            }
        }
    }
}
