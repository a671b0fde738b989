//! Terminal input and frame pacing, merged into one channel for the
//! dashboard loop.

use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Notification expiry and the "updated … ago" label age on this beat.
pub const TICK_RATE: Duration = Duration::from_millis(250);
/// Roughly 30 frames per second.
pub const FRAME_RATE: Duration = Duration::from_millis(33);

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Render,
}

/// Only key presses and resizes reach the dashboard. Releases, repeats,
/// mouse, focus and paste traffic are dropped.
pub fn translate(event: TermEvent) -> Option<Event> {
    match event {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        TermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

/// Feed input and pacing events into `tx` until `cancel` fires, the
/// receiver is dropped, or the terminal input stream ends.
pub fn spawn_event_pump(
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut input = EventStream::new();
        let mut tick = tokio::time::interval(TICK_RATE);
        let mut frame = tokio::time::interval(FRAME_RATE);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        frame.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let event = tokio::select! {
                () = cancel.cancelled() => break,
                _ = tick.tick() => Event::Tick,
                _ = frame.tick() => Event::Render,
                next = input.next() => match next {
                    Some(Ok(raw)) => match translate(raw) {
                        Some(event) => event,
                        None => continue,
                    },
                    Some(Err(e)) => {
                        warn!(error = %e, "terminal input error");
                        continue;
                    }
                    None => {
                        debug!("terminal input closed");
                        break;
                    }
                },
            };

            if tx.send(event).is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    #[test]
    fn presses_and_resizes_pass_through() {
        let press = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert!(matches!(
            translate(TermEvent::Key(press)),
            Some(Event::Key(k)) if k.code == KeyCode::Char('r')
        ));
        assert!(matches!(
            translate(TermEvent::Resize(120, 40)),
            Some(Event::Resize(120, 40))
        ));
    }

    #[test]
    fn releases_and_focus_changes_are_dropped() {
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Release);
        assert!(translate(TermEvent::Key(release)).is_none());
        assert!(translate(TermEvent::FocusGained).is_none());
        assert!(translate(TermEvent::Paste("KA01".into())).is_none());
    }
}
