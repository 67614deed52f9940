//! Application core — event loop, action dispatch, overlay management.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use hostpulse_core::{Command, Session, SessionEvent};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::dashboard::Dashboard;
use crate::data_bridge::run_data_bridge;
use crate::event::{Event, EventReader};
use crate::term::Term;
use crate::theme;

/// How long a toast notification stays visible.
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Top-level application state and event loop.
pub struct App {
    session: Session,
    session_events: Option<mpsc::UnboundedReceiver<SessionEvent>>,
    dashboard: Dashboard,
    running: bool,
    help_visible: bool,
    /// Modal confirmation awaiting y/n.
    pending_confirm: Option<ConfirmAction>,
    /// Blocking notice that must be acknowledged before anything else.
    blocking_notice: Option<String>,
    notification: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(session: Session, session_events: mpsc::UnboundedReceiver<SessionEvent>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            session,
            session_events: Some(session_events),
            dashboard: Dashboard::new(),
            running: true,
            help_visible: false,
            pending_confirm: None,
            blocking_notice: None,
            notification: None,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut term = Term::new()?;
        term.enter()?;
        self.dashboard.init(self.action_tx.clone())?;

        self.session.start().await;
        let bridge_cancel = CancellationToken::new();
        if let Some(events) = self.session_events.take() {
            tokio::spawn(run_data_bridge(
                events,
                self.action_tx.clone(),
                bridge_cancel.clone(),
            ));
        }

        let mut events = EventReader::spawn();
        info!("event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    term.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        bridge_cancel.cancel();
        self.session.shutdown().await;
        info!("event loop ended");
        Ok(())
    }

    /// Map a key event to an action, respecting overlay precedence:
    /// blocking notice, then confirm dialog, then help, then the dashboard's
    /// own prompt, then global keys.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.blocking_notice.is_some() {
            return Ok(match key.code {
                KeyCode::Enter | KeyCode::Esc => Some(Action::DismissNotice),
                _ => None,
            });
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        // A text prompt swallows everything, including 'q'.
        if self.dashboard.prompt_open() {
            return self.dashboard.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            _ => {}
        }

        self.dashboard.handle_key_event(key)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.blocking_notice.is_some() || self.pending_confirm.is_some() || self.help_visible {
            return Ok(None);
        }
        self.dashboard.handle_mouse_event(mouse)
    }

    /// Queue a configuration command on the session without blocking the
    /// UI loop.
    fn dispatch(&self, cmd: Command) {
        let session = self.session.clone();
        tokio::spawn(async move {
            if session.execute(cmd).await.is_err() {
                warn!("session closed, command dropped");
            }
        });
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Tick => {
                let expired = self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, born)| born.elapsed() > NOTIFICATION_TTL);
                if expired {
                    self.notification = None;
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    match confirm {
                        ConfirmAction::RemoveGroup { name } => {
                            self.dispatch(Command::RemoveGroup { name });
                        }
                    }
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,

            Action::ShowNotice(message) => self.blocking_notice = Some(message.clone()),
            Action::DismissNotice => self.blocking_notice = None,

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }

            Action::SubmitAddGroup { name } => {
                self.dispatch(Command::AddGroup { name: name.clone() });
            }
            Action::SubmitAddHost {
                address,
                label,
                group,
            } => {
                self.dispatch(Command::AddHost {
                    address: address.clone(),
                    label: label.clone(),
                    group: group.clone(),
                });
            }
            Action::SubmitRemoveHost { address } => {
                self.dispatch(Command::RemoveHost {
                    address: address.clone(),
                });
            }

            // Render is handled in the main loop, not here
            Action::Render | Action::Resize(..) => {}

            // Everything else belongs to the dashboard
            other => {
                if let Some(follow_up) = self.dashboard.update(other)? {
                    self.action_tx.send(follow_up)?;
                }
            }
        }
        Ok(())
    }

    // ── Rendering ─────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::vertical([
            Constraint::Min(1),    // dashboard
            Constraint::Length(1), // status bar
        ])
        .split(area);

        self.dashboard.render(frame, layout[0]);
        self.render_status_bar(frame, layout[1]);

        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
        if let Some(confirm) = &self.pending_confirm {
            render_modal(
                frame,
                area,
                " Confirm ",
                &confirm.to_string(),
                "y yes · n no",
            );
        }
        if let Some(notice) = &self.blocking_notice {
            render_modal(frame, area, " Notice ", notice, "Enter dismiss");
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::raw(" "),
            Span::styled(
                self.session.config().url.as_str().to_owned(),
                Style::default().fg(theme::NEON_CYAN),
            ),
        ];

        if let Some((notification, _)) = &self.notification {
            let color = match notification.level {
                NotificationLevel::Info => theme::DIM_WHITE,
                NotificationLevel::Success => theme::SUCCESS_GREEN,
                NotificationLevel::Error => theme::ERROR_RED,
            };
            spans.push(Span::styled(
                format!("  {}", notification.message),
                Style::default().fg(color),
            ));
        } else {
            spans.push(Span::styled(
                " │ g group  a host  x close  ←/→ tabs  ? help  q quit",
                theme::key_hint(),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let width = 52u16.min(area.width.saturating_sub(4));
        let height = 16u16.min(area.height.saturating_sub(4));
        let popup = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let hint = |k: &'static str, d: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {k:<10}"), theme::key_hint_key()),
                Span::styled(d, theme::key_hint()),
            ])
        };
        let text = vec![
            Line::from(""),
            hint("1-9", "Switch group"),
            hint("←/→ h/l", "Switch host tab"),
            hint("</>", "Move host tab (visual only)"),
            Line::from(""),
            hint("g", "Add group"),
            hint("a", "Add host to active group"),
            hint("x", "Close active host tab"),
            hint("d", "Remove active group"),
            Line::from(""),
            hint("mouse", "Click tabs, drag to reorder"),
            hint("?", "This help"),
            hint("q", "Quit"),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }
}

/// Small centered modal with a message and a key-hint footer.
fn render_modal(frame: &mut Frame, area: Rect, title: &str, message: &str, hints: &str) {
    let width = 50u16.min(area.width.saturating_sub(4));
    let height = 6u16.min(area.height.saturating_sub(2));
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(title.to_owned())
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let text = vec![
        Line::from(Span::styled(
            message.to_owned(),
            Style::default().fg(theme::DIM_WHITE),
        )),
        Line::from(""),
        Line::from(Span::styled(hints.to_owned(), theme::key_hint())),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
}
