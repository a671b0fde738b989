//! Entry status badge: ● Inside / ○ Exited.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use gatelog_core::EntryStatus;

use crate::theme;

/// Returns a styled `Span` with the status dot and label.
pub fn status_span(status: EntryStatus) -> Span<'static> {
    Span::styled(
        format!("{} {status}", status_char(status)),
        Style::default()
            .fg(theme::status_color(status))
            .add_modifier(Modifier::BOLD),
    )
}

pub fn status_char(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Inside => "●",
        EntryStatus::Exited => "○",
    }
}
