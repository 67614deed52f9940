//! Terminal event reader running in a background tokio task.
//!
//! Merges crossterm input (key, mouse, resize) with tick/render pulses into
//! one `tokio::sync::mpsc` stream so the app loop has a single thing to
//! await on.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Housekeeping pulse (notification expiry).
const TICK_RATE: Duration = Duration::from_millis(250);
/// Render pulse, ~30 FPS.
const RENDER_RATE: Duration = Duration::from_millis(33);

/// Events produced by the terminal event reader.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed (release/repeat are filtered out).
    Key(KeyEvent),
    /// A mouse action occurred.
    Mouse(MouseEvent),
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
    /// Housekeeping pulse.
    Tick,
    /// Render pulse.
    Render,
}

/// Reads terminal events in a background task and sends them over a channel.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Spawn the background event reader.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        tokio::spawn(read_loop(tx, task_cancel));

        Self { rx, cancel }
    }

    /// Receive the next event. Returns `None` if the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Signal the background reader to stop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn read_loop(tx: mpsc::UnboundedSender<Event>, cancel: CancellationToken) {
    let mut input = EventStream::new();
    let mut tick = tokio::time::interval(TICK_RATE);
    let mut render = tokio::time::interval(RENDER_RATE);

    // Don't burst pulses if we fall behind
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    render.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,

            _ = tick.tick() => Event::Tick,

            _ = render.tick() => Event::Render,

            Some(Ok(raw)) = input.next() => match raw {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
                CrosstermEvent::Mouse(mouse) => Event::Mouse(mouse),
                CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
                _ => continue,
            },
        };

        // Receiver dropped means the app loop ended.
        if tx.send(event).is_err() {
            break;
        }
    }
}
