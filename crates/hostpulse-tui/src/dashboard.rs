//! Dashboard screen — group bar, host tab strip, and the latency chart for
//! the active host.
//!
//! All configuration intents are validated against [`DashboardState`]
//! before anything is dispatched; the state itself only changes when the
//! session confirms the mutation and the confirmation comes back through
//! [`Action`]s.

use std::cell::Cell;
use std::collections::HashMap;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use hostpulse_core::{AddGroupCheck, AddHostCheck, DashboardState};

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::chart::LatencyChart;
use crate::widgets::tab_strip::{self, TabItem};

/// Which field of the add-host prompt is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostField {
    Address,
    Label,
}

/// Modal text prompt for configuration input.
enum Prompt {
    AddGroup {
        input: String,
    },
    AddHost {
        address: String,
        label: String,
        field: HostField,
    },
}

/// The single screen of the application.
pub struct Dashboard {
    state: DashboardState,
    /// Chart render state per displayed host.
    charts: HashMap<String, LatencyChart>,
    prompt: Option<Prompt>,
    /// Host-strip press position, pending a release that decides between
    /// click and drag.
    pressed_host: Option<usize>,
    // Inner strip areas captured at render time for mouse hit-testing.
    group_area: Cell<Rect>,
    host_area: Cell<Rect>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            state: DashboardState::new(),
            charts: HashMap::new(),
            prompt: None,
            pressed_host: None,
            group_area: Cell::new(Rect::default()),
            host_area: Cell::new(Rect::default()),
        }
    }

    /// Whether a modal prompt is capturing keyboard input.
    pub fn prompt_open(&self) -> bool {
        self.prompt.is_some()
    }

    // ── Tab models ────────────────────────────────────────────────

    fn group_tabs(&self) -> Vec<TabItem> {
        self.state
            .groups()
            .map(|group| TabItem::group(group.name.clone()))
            .collect()
    }

    fn host_tabs(&self) -> Vec<TabItem> {
        self.state
            .displayed_hosts()
            .into_iter()
            .map(|host| {
                let status = self.state.host_status(&host.address);
                TabItem::host(
                    host.address,
                    host.label,
                    (theme::status_glyph(status), theme::status_color(status)),
                )
            })
            .collect()
    }

    // ── Local transitions ─────────────────────────────────────────

    /// Rebuild chart entries to mirror the displayed host set.
    fn sync_charts(&mut self) {
        let displayed: Vec<String> = self
            .state
            .displayed_hosts()
            .into_iter()
            .map(|h| h.address)
            .collect();
        self.charts.retain(|address, _| displayed.contains(address));
        for address in displayed {
            let chart = self.charts.entry(address.clone()).or_default();
            chart.replace_series(self.state.series(&address).unwrap_or(&[]));
        }
    }

    fn activate_group(&mut self, name: &str) {
        if self.state.activate_group(name) {
            self.pressed_host = None;
            self.sync_charts();
        }
    }

    fn cycle_host(&mut self, forward: bool) {
        let displayed = self.state.displayed_hosts();
        if displayed.is_empty() {
            return;
        }
        let current = self
            .state
            .active_host()
            .and_then(|active| displayed.iter().position(|h| h.address == active))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % displayed.len()
        } else {
            (current + displayed.len() - 1) % displayed.len()
        };
        self.state.activate_host(&displayed[next].address);
    }

    /// Move the active tab one slot left or right. Visual only.
    fn nudge_active_tab(&mut self, forward: bool) {
        let displayed = self.state.displayed_hosts();
        let Some(active) = self.state.active_host().map(str::to_owned) else {
            return;
        };
        let Some(current) = displayed.iter().position(|h| h.address == active) else {
            return;
        };
        let target = if forward {
            current + 1
        } else {
            current.wrapping_sub(1)
        };
        let Some(target) = displayed.get(target) else {
            return;
        };
        self.state.begin_drag(&active);
        self.state.drop_on(&target.address);
    }

    // ── Prompt handling ───────────────────────────────────────────

    fn open_add_group(&mut self) {
        self.prompt = Some(Prompt::AddGroup {
            input: String::new(),
        });
    }

    fn open_add_host(&mut self) -> Option<Action> {
        if self.state.active_group().is_none() {
            return Some(Action::Notify(Notification::info(
                "Select a group before adding hosts",
            )));
        }
        self.prompt = Some(Prompt::AddHost {
            address: String::new(),
            label: String::new(),
            field: HostField::Address,
        });
        None
    }

    /// Validate and submit the open prompt. Silent rejections close the
    /// prompt without dispatching anything; the host cap raises a blocking
    /// notice instead.
    fn submit_prompt(&mut self) -> Option<Action> {
        let prompt = self.prompt.take()?;
        match prompt {
            Prompt::AddGroup { input } => match self.state.check_add_group(&input) {
                AddGroupCheck::Accepted(name) => Some(Action::SubmitAddGroup { name }),
                AddGroupCheck::EmptyName | AddGroupCheck::Duplicate => None,
            },
            Prompt::AddHost { address, label, .. } => {
                match self.state.check_add_host(&address, &label) {
                    AddHostCheck::Accepted { address, label } => {
                        let group = self.state.active_group()?.to_owned();
                        Some(Action::SubmitAddHost {
                            address,
                            label,
                            group,
                        })
                    }
                    AddHostCheck::LimitReached => Some(Action::ShowNotice(format!(
                        "Host limit reached ({} displayed). Close a tab before adding more.",
                        self.state.displayed_count()
                    ))),
                    AddHostCheck::EmptyAddress
                    | AddHostCheck::AlreadyDisplayed
                    | AddHostCheck::NoActiveGroup => None,
                }
            }
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                None
            }
            KeyCode::Enter => self.submit_prompt(),
            KeyCode::Tab | KeyCode::BackTab => {
                if let Some(Prompt::AddHost { field, .. }) = &mut self.prompt {
                    *field = match field {
                        HostField::Address => HostField::Label,
                        HostField::Label => HostField::Address,
                    };
                }
                None
            }
            code => {
                let input = match &mut self.prompt {
                    Some(Prompt::AddGroup { input }) => Some(input),
                    Some(Prompt::AddHost {
                        address,
                        label,
                        field,
                    }) => Some(match field {
                        HostField::Address => address,
                        HostField::Label => label,
                    }),
                    None => None,
                };
                if let Some(input) = input {
                    match code {
                        KeyCode::Char(c) => input.push(c),
                        KeyCode::Backspace => {
                            input.pop();
                        }
                        _ => {}
                    }
                }
                None
            }
        }
    }

    // ── Mouse handling ────────────────────────────────────────────

    fn mouse_in(area: Rect, mouse: &MouseEvent) -> Option<u16> {
        if mouse.row >= area.y
            && mouse.row < area.y + area.height
            && mouse.column >= area.x
            && mouse.column < area.x + area.width
        {
            Some(mouse.column - area.x)
        } else {
            None
        }
    }

    fn handle_group_click(&mut self, x: u16) -> Option<Action> {
        let tabs = self.group_tabs();
        let hit = tab_strip::hit_test(&tabs, true, x)?;
        let name = tabs.get(hit.index)?.id.clone();
        if hit.on_close {
            Some(Action::ShowConfirm(ConfirmAction::RemoveGroup { name }))
        } else {
            self.activate_group(&name);
            None
        }
    }

    fn handle_host_press(&mut self, x: u16) -> Option<Action> {
        let tabs = self.host_tabs();
        let hit = tab_strip::hit_test(&tabs, true, x)?;
        let address = tabs.get(hit.index)?.id.clone();
        if hit.on_close {
            // Closing a host tab fires immediately, no confirmation.
            return Some(Action::SubmitRemoveHost { address });
        }
        // Click or drag start: decided on release.
        self.pressed_host = Some(hit.index);
        self.state.begin_drag(&address);
        None
    }

    fn handle_host_release(&mut self, x: u16) {
        let Some(pressed) = self.pressed_host.take() else {
            self.state.cancel_drag();
            return;
        };
        let tabs = self.host_tabs();
        match tab_strip::hit_test(&tabs, true, x) {
            Some(hit) if hit.index == pressed => {
                // Same tab: a plain click, activate it.
                self.state.cancel_drag();
                if let Some(tab) = tabs.get(hit.index) {
                    self.state.activate_host(&tab.id);
                }
            }
            Some(hit) => {
                if let Some(target) = tabs.get(hit.index) {
                    self.state.drop_on(&target.id);
                }
            }
            None => self.state.cancel_drag(),
        }
    }

    // ── Rendering ─────────────────────────────────────────────────

    fn render_group_bar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Groups ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.group_area.set(inner);

        let tabs = self.group_tabs();
        if tabs.is_empty() {
            frame.render_widget(
                Paragraph::new("  No groups yet — press g to add one")
                    .style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
            return;
        }
        let line = tab_strip::build_line(&tabs, self.state.active_group(), None, true);
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn render_host_bar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Hosts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.host_area.set(inner);

        let tabs = self.host_tabs();
        if tabs.is_empty() {
            let hint = if self.state.active_group().is_some() {
                "  No hosts in this group — press a to add one"
            } else {
                "  Select a group to see its hosts"
            };
            frame.render_widget(
                Paragraph::new(hint).style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
            return;
        }
        let line = tab_strip::build_line(
            &tabs,
            self.state.active_host(),
            self.state.dragged(),
            true,
        );
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect) {
        let Some(address) = self.state.active_host() else {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border_default());
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  No host selected")
                    .style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
            return;
        };

        let label = self
            .state
            .displayed_hosts()
            .into_iter()
            .find(|h| h.address == address)
            .map_or_else(|| address.to_owned(), |h| h.label);
        let title = if label == address {
            label
        } else {
            format!("{label} ({address})")
        };

        if let Some(chart) = self.charts.get(address) {
            chart.render(frame, area, &title);
        }
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect) {
        let Some(prompt) = &self.prompt else { return };

        let width = 48u16.min(area.width.saturating_sub(4));
        let height = 6u16;
        let popup = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height.min(area.height),
        );
        frame.render_widget(Clear, popup);

        let (title, lines) = match prompt {
            Prompt::AddGroup { input } => (
                " Add group ",
                vec![
                    Line::from(vec![
                        Span::styled("Name: ", theme::key_hint()),
                        Span::styled(input.clone(), theme::tab_active()),
                        Span::styled("▏", theme::tab_active()),
                    ]),
                    Line::from(""),
                    Line::from(Span::styled("Enter add · Esc cancel", theme::key_hint())),
                ],
            ),
            Prompt::AddHost {
                address,
                label,
                field,
            } => {
                let field_style = |f: HostField| {
                    if *field == f {
                        theme::tab_active()
                    } else {
                        theme::tab_inactive()
                    }
                };
                let cursor = |f: HostField| if *field == f { "▏" } else { "" };
                (
                    " Add host ",
                    vec![
                        Line::from(vec![
                            Span::styled("Address: ", theme::key_hint()),
                            Span::styled(address.clone(), field_style(HostField::Address)),
                            Span::styled(cursor(HostField::Address), theme::tab_active()),
                        ]),
                        Line::from(vec![
                            Span::styled("Label:   ", theme::key_hint()),
                            Span::styled(label.clone(), field_style(HostField::Label)),
                            Span::styled(cursor(HostField::Label), theme::tab_active()),
                        ]),
                        Line::from(Span::styled(
                            "Tab switch · Enter add · Esc cancel",
                            theme::key_hint(),
                        )),
                    ],
                )
            }
        };

        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for Dashboard {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.prompt.is_some() {
            return Ok(self.handle_prompt_key(key));
        }

        let action = match key.code {
            KeyCode::Char('g') => {
                self.open_add_group();
                None
            }
            KeyCode::Char('a') => self.open_add_host(),

            KeyCode::Left | KeyCode::Char('h') => {
                self.cycle_host(false);
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.cycle_host(true);
                None
            }

            // Visual-only reorder of the active host tab
            KeyCode::Char('<') | KeyCode::Char(',') => {
                self.nudge_active_tab(false);
                None
            }
            KeyCode::Char('>') | KeyCode::Char('.') => {
                self.nudge_active_tab(true);
                None
            }

            KeyCode::Char('x') => self
                .state
                .active_host()
                .map(|address| Action::SubmitRemoveHost {
                    address: address.to_owned(),
                }),

            KeyCode::Char('d') => self
                .state
                .active_group()
                .map(|name| Action::ShowConfirm(ConfirmAction::RemoveGroup {
                    name: name.to_owned(),
                })),

            // Jump to group by position
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                let name = self.state.groups().nth(index).map(|g| g.name.clone());
                if let Some(name) = name {
                    self.activate_group(&name);
                }
                None
            }

            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.prompt.is_some() {
            return Ok(None);
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(x) = Self::mouse_in(self.group_area.get(), &mouse) {
                    return Ok(self.handle_group_click(x));
                }
                if let Some(x) = Self::mouse_in(self.host_area.get(), &mouse) {
                    return Ok(self.handle_host_press(x));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(x) = Self::mouse_in(self.host_area.get(), &mouse) {
                    self.handle_host_release(x);
                } else {
                    self.pressed_host = None;
                    self.state.cancel_drag();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Seeded(groups) => {
                self.state.seed(groups.clone());
                self.sync_charts();
            }
            Action::SeedFailed(reason) => {
                return Ok(Some(Action::Notify(Notification::error(format!(
                    "Could not load configuration: {reason}"
                )))));
            }

            Action::GroupAdded { name } => {
                self.state.confirm_add_group(name);
                // First group: make it active right away.
                if self.state.active_group().is_none() {
                    self.activate_group(name);
                }
                return Ok(Some(Action::Notify(Notification::success(format!(
                    "Group {name} added"
                )))));
            }
            Action::GroupRemoved { name } => {
                self.state.confirm_remove_group(name);
                self.sync_charts();
                return Ok(Some(Action::Notify(Notification::success(format!(
                    "Group {name} removed"
                )))));
            }
            Action::HostAdded {
                address,
                label,
                group,
            } => {
                self.state.confirm_add_host(address, label, group);
                self.sync_charts();
            }
            Action::HostRemoved { address } => {
                self.state.confirm_remove_host(address);
                self.sync_charts();
            }

            Action::DataUpdated(data) => {
                self.state.apply_poll(data.clone());
                self.sync_charts();
            }

            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(3), // group bar
            Constraint::Length(3), // host bar
            Constraint::Min(5),    // chart
        ])
        .split(area);

        self.render_group_bar(frame, layout[0]);
        self.render_host_bar(frame, layout[1]);
        self.render_chart(frame, layout[2]);
        self.render_prompt(frame, area);
    }
}
