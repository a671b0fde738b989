//! Two-slice occupancy chart drawn as a proportional stacked bar.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use gatelog_core::{ChartSlices, EntryStatus};

use crate::theme::{self, Palette};

const FILL: &str = "█";

/// One chart instance; owned by a `ChartSlot` so it is rebuilt, not mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyChart {
    slices: ChartSlices,
}

impl OccupancyChart {
    pub fn new(slices: ChartSlices) -> Self {
        Self { slices }
    }

    /// Cells given to (inside, exited) for a bar `width` cells wide.
    ///
    /// A non-empty slice always gets at least one cell when there is room.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    pub fn split(&self, width: u16) -> (u16, u16) {
        let s = self.slices;
        if s.total() == 0 || width == 0 {
            return (0, 0);
        }
        let mut inside = (s.inside_ratio() * f64::from(width)).round() as u16;
        if s.inside > 0 && inside == 0 {
            inside = 1;
        }
        if s.exited > 0 && inside == width && width > 1 {
            inside -= 1;
        }
        (inside, width - inside)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = Block::default()
            .title(" Occupancy ")
            .title_style(palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        let bar = if self.slices.total() == 0 {
            Line::from(Span::styled("No entries yet", palette.placeholder()))
        } else {
            let (inside, exited) = self.split(rows[0].width);
            Line::from(vec![
                Span::styled(
                    FILL.repeat(usize::from(inside)),
                    Style::default().fg(theme::status_color(EntryStatus::Inside)),
                ),
                Span::styled(
                    FILL.repeat(usize::from(exited)),
                    Style::default().fg(theme::status_color(EntryStatus::Exited)),
                ),
            ])
        };
        frame.render_widget(Paragraph::new(bar), rows[0]);

        let legend = Line::from(vec![
            Span::styled(
                "■ ",
                Style::default().fg(theme::status_color(EntryStatus::Inside)),
            ),
            Span::styled(format!("Inside {}   ", self.slices.inside), palette.table_row()),
            Span::styled(
                "■ ",
                Style::default().fg(theme::status_color(EntryStatus::Exited)),
            ),
            Span::styled(format!("Exited {}", self.slices.exited), palette.table_row()),
        ]);
        frame.render_widget(Paragraph::new(legend), rows[1]);
    }
}
