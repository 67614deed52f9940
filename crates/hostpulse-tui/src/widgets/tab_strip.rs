//! Horizontal tab strip with optional close glyphs and mouse hit-testing.
//!
//! Used for both the group bar and the host bar. Layout and hit-testing
//! share one width computation, so a click always resolves to the tab the
//! operator sees under the cursor.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::theme;

const CLOSE_GLYPH: char = '✕';

/// One tab in a strip.
#[derive(Debug, Clone)]
pub struct TabItem {
    /// Stable identity (group name or host address).
    pub id: String,
    /// Display text.
    pub title: String,
    /// Leading status glyph, host tabs only.
    pub glyph: Option<(&'static str, Color)>,
}

impl TabItem {
    pub fn group(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            glyph: None,
        }
    }

    pub fn host(id: impl Into<String>, title: impl Into<String>, glyph: (&'static str, Color)) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            glyph: Some(glyph),
        }
    }
}

/// Result of a mouse hit-test against a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabHit {
    pub index: usize,
    /// The click landed on the close glyph.
    pub on_close: bool,
}

/// Rendered character width of one tab cell.
///
/// Cell layout: `␣[glyph␣]title[␣✕]␣` — the same arithmetic drives
/// [`build_line`] and [`hit_test`].
fn cell_width(item: &TabItem, closable: bool) -> u16 {
    let glyph = if item.glyph.is_some() { 2 } else { 0 };
    let close = if closable { 2 } else { 0 };
    #[allow(clippy::cast_possible_truncation)]
    let title = item.title.chars().count() as u16;
    1 + glyph + title + close + 1
}

/// Build the strip as a single styled line.
pub fn build_line<'a>(
    items: &'a [TabItem],
    active_id: Option<&str>,
    dragged_id: Option<&str>,
    closable: bool,
) -> Line<'a> {
    let mut spans = Vec::with_capacity(items.len() * 4);

    for item in items {
        let style = if dragged_id == Some(item.id.as_str()) {
            theme::tab_dragged()
        } else if active_id == Some(item.id.as_str()) {
            theme::tab_active()
        } else {
            theme::tab_inactive()
        };

        spans.push(Span::styled(" ", style));
        if let Some((glyph, color)) = item.glyph {
            spans.push(Span::styled(
                format!("{glyph} "),
                Style::default().fg(color),
            ));
        }
        spans.push(Span::styled(item.title.as_str(), style));
        if closable {
            spans.push(Span::styled(
                format!(" {CLOSE_GLYPH}"),
                theme::key_hint(),
            ));
        }
        spans.push(Span::styled(" ", style));
    }

    Line::from(spans)
}

/// Resolve a column offset (relative to the strip's left edge) to a tab.
pub fn hit_test(items: &[TabItem], closable: bool, x: u16) -> Option<TabHit> {
    let mut start = 0u16;
    for (index, item) in items.iter().enumerate() {
        let width = cell_width(item, closable);
        let end = start + width;
        if x >= start && x < end {
            // Close glyph sits one column before the trailing pad.
            let on_close = closable && x == end - 2;
            return Some(TabHit { index, on_close });
        }
        start = end;
    }
    None
}
