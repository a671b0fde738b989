//! Horizontal selector line, used for the status filter.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme::Palette;

/// Renders a horizontal tab bar line with the active tab highlighted.
pub fn render_sub_tabs<'a>(labels: &[&'a str], active_index: usize, palette: &Palette) -> Line<'a> {
    let mut spans = Vec::with_capacity(labels.len() * 2);

    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", palette.key_hint()));
        }

        if i == active_index {
            spans.push(Span::styled(
                format!("[{label}]"),
                palette.title().add_modifier(Modifier::UNDERLINED),
            ));
        } else {
            spans.push(Span::styled(*label, palette.key_hint()));
        }
    }

    Line::from(spans)
}
