//! Dashboard screen: statistics cards, occupancy chart and the vehicle table.
//!
//! The screen is the terminal implementation of [`Renderer`]. Incoming
//! data actions are turned into view models through the same core paths
//! the HTML report uses, and `render` only draws what was last stored.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use gatelog_core::{
    ChartSlices, ChartSlot, LoadState, Renderer, Statistics, StatusFilter, TableBody,
    VehicleSnapshot, apply_filter,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme::{self, Palette};
use crate::widgets::occupancy::OccupancyChart;
use crate::widgets::{stat_card, status_badge, sub_tabs};

const STATUS_TABS: [&str; 3] = ["All", "Inside", "Exited"];

const HEADERS: [&str; 7] = [
    "Vehicle No",
    "Visitor",
    "Phone",
    "Purpose",
    "In Time",
    "Out Time",
    "Status",
];

fn column_widths() -> [Constraint; 7] {
    [
        Constraint::Length(12),
        Constraint::Fill(2),
        Constraint::Length(12),
        Constraint::Fill(2),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(9),
    ]
}

fn status_index(status: StatusFilter) -> usize {
    match status {
        StatusFilter::All => 0,
        StatusFilter::Inside => 1,
        StatusFilter::Exited => 2,
    }
}

pub struct DashboardScreen {
    palette: Palette,
    stats: Statistics,
    chart: ChartSlot<OccupancyChart>,
    body: TableBody,
    /// `(shown, total)` from the last filter pass; `None` while a
    /// placeholder stands in for the rows.
    count: Option<(usize, usize)>,
    all: VehicleSnapshot,
    load_state: LoadState,
    /// Set after the first successful load.
    has_data: bool,
    query: String,
    status: StatusFilter,
    table_state: TableState,
}

impl DashboardScreen {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            stats: Statistics::default(),
            chart: ChartSlot::new(),
            body: TableBody::loading(),
            count: None,
            all: Arc::new(Vec::new()),
            load_state: LoadState::Idle,
            has_data: false,
            query: String::new(),
            status: StatusFilter::All,
            table_state: TableState::default(),
        }
    }

    /// Recompute the table from the current load state, query and selector.
    fn rebuild_table(&mut self) {
        match self.load_state {
            LoadState::Failed(failure) => {
                self.count = None;
                self.render_failure(failure);
            }
            LoadState::Idle | LoadState::Loading if !self.has_data => {
                self.count = None;
                self.render_table(&TableBody::loading());
            }
            _ => {
                let all = Arc::clone(&self.all);
                let query = self.query.clone();
                let status = self.status;
                apply_filter(self, &all, &query, status);
            }
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        match &self.body {
            TableBody::Rows(rows) if !rows.is_empty() => {
                let last = rows.len() - 1;
                let idx = self.table_state.selected().unwrap_or(0).min(last);
                self.table_state.select(Some(idx));
            }
            _ => self.table_state.select(None),
        }
    }

    fn move_selection(&mut self, down: bool) {
        let TableBody::Rows(rows) = &self.body else {
            return;
        };
        if rows.is_empty() {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(rows.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.table_state.select(Some(next));
    }

    // ── Drawing ──────────────────────────────────────────────────────

    fn draw_stat_cards(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        let p = &self.palette;
        let s = &self.stats;
        stat_card::render_stat_card(frame, cols[0], "Total Entries", s.total_entries, p.accent, p);
        stat_card::render_stat_card(frame, cols[1], "Inside Now", s.open_entries, theme::AMBER, p);
        stat_card::render_stat_card(frame, cols[2], "Exited", s.closed_entries, theme::GREEN, p);
        stat_card::render_stat_card(
            frame,
            cols[3],
            "Unique Vehicles",
            s.unique_vehicles,
            theme::SKY,
            p,
        );
    }

    fn draw_chart(&self, frame: &mut Frame, area: Rect) {
        if let Some(chart) = self.chart.get() {
            chart.render(frame, area, &self.palette);
            return;
        }
        let block = Block::default()
            .title(" Occupancy ")
            .title_style(self.palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.palette.border());
        frame.render_widget(
            Paragraph::new(Span::styled("Loading...", self.palette.placeholder())).block(block),
            area,
        );
    }

    fn draw_filter_line(&self, frame: &mut Frame, area: Rect) {
        let mut line = sub_tabs::render_sub_tabs(
            &STATUS_TABS,
            status_index(self.status),
            &self.palette,
        );
        line.spans.insert(0, Span::styled(" Status: ", self.palette.key_hint()));
        if !self.query.is_empty() {
            line.spans
                .push(Span::styled("   Search: ", self.palette.key_hint()));
            line.spans
                .push(Span::styled(self.query.clone(), self.palette.title()));
        }
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Vehicle Log ")
            .title_style(self.palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.palette.border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Row::new(HEADERS).style(self.palette.table_header());

        match &self.body {
            TableBody::Rows(rows) => {
                let rows: Vec<Row> = rows
                    .iter()
                    .map(|r| {
                        Row::new(vec![
                            Cell::from(r.vehicle_no.clone()),
                            Cell::from(r.visitor_name.clone()),
                            Cell::from(r.phone.clone()),
                            Cell::from(r.purpose.clone()),
                            Cell::from(r.in_time.clone()),
                            Cell::from(r.out_time.clone()),
                            Cell::from(status_badge::status_span(r.status)),
                        ])
                        .style(self.palette.table_row())
                    })
                    .collect();
                let table = Table::new(rows, column_widths())
                    .header(header)
                    .row_highlight_style(self.palette.table_selected());
                frame.render_stateful_widget(table, inner, &mut self.table_state);
            }
            TableBody::Placeholder(message) => {
                let parts =
                    Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).split(inner);
                frame.render_widget(
                    Table::new(Vec::<Row>::new(), column_widths()).header(header),
                    parts[0],
                );
                frame.render_widget(
                    Paragraph::new(Span::styled(message.clone(), self.palette.placeholder()))
                        .alignment(Alignment::Center),
                    parts[1],
                );
            }
        }
    }

    fn draw_count(&self, frame: &mut Frame, area: Rect) {
        let text = match self.count {
            Some((shown, total)) => format!(" Showing {shown} of {total} entries"),
            None => String::new(),
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, self.palette.key_hint()))),
            area,
        );
    }
}

impl Renderer for DashboardScreen {
    fn render_table(&mut self, body: &TableBody) {
        self.body = body.clone();
    }

    fn render_stats(&mut self, stats: &Statistics) {
        self.stats = *stats;
    }

    fn render_chart(&mut self, slices: ChartSlices) {
        self.chart.replace_with(|| OccupancyChart::new(slices));
    }

    fn render_result_count(&mut self, shown: usize, total: usize) {
        self.count = Some((shown, total));
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers != KeyModifiers::NONE && key.modifiers != KeyModifiers::SHIFT {
            return Ok(None);
        }
        let action = match key.code {
            KeyCode::Char('s') => Some(Action::CycleStatusFilter),
            KeyCode::Char('r') => Some(Action::RequestRefresh),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Char('e') => Some(Action::RequestExport),
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(true);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(false);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::CycleStatusFilter => {
                self.status = self.status.cycle();
                self.rebuild_table();
            }
            Action::SearchInput(query) => {
                self.query.clone_from(query);
                self.rebuild_table();
            }
            Action::CloseSearch => {
                self.query.clear();
                self.rebuild_table();
            }
            Action::ThemeChanged(mode) => {
                self.palette = Palette::for_mode(*mode);
            }
            Action::VehiclesUpdated(snapshot) => {
                self.all = Arc::clone(snapshot);
                self.rebuild_table();
            }
            Action::StatisticsUpdated(stats) => {
                self.render_stats(stats);
                self.render_chart(ChartSlices::from(stats));
            }
            Action::LoadStateChanged(state) => {
                self.load_state = *state;
                if *state == LoadState::Ready {
                    self.has_data = true;
                }
                self.rebuild_table();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

        self.draw_stat_cards(frame, layout[0]);
        self.draw_chart(frame, layout[1]);
        self.draw_filter_line(frame, layout[2]);
        self.draw_table(frame, layout[3]);
        self.draw_count(frame, layout[4]);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gatelog_core::{EntryStatus, LoadFailure, VehicleEntry};
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn entry(no: &str, out_time: Option<&str>) -> Arc<VehicleEntry> {
        Arc::new(VehicleEntry {
            vehicle_no: no.into(),
            visitor_name: Some("Ravi".into()),
            phone: None,
            purpose: Some("Delivery".into()),
            in_time: "2024-03-05 09:15:00".into(),
            out_time: out_time.map(str::to_owned),
            image_path: None,
        })
    }

    fn loaded_screen() -> DashboardScreen {
        let mut screen = DashboardScreen::new(Palette::DARK);
        let snapshot: VehicleSnapshot = Arc::new(vec![
            entry("KA01AB1234", None),
            entry("KA02CD5678", Some("2024-03-05 10:00:00")),
        ]);
        screen.update(&Action::VehiclesUpdated(snapshot)).unwrap();
        screen
            .update(&Action::LoadStateChanged(LoadState::Ready))
            .unwrap();
        screen
    }

    fn vehicle_order(screen: &DashboardScreen) -> Vec<String> {
        match &screen.body {
            TableBody::Rows(rows) => rows.iter().map(|r| r.vehicle_no.clone()).collect(),
            TableBody::Placeholder(msg) => vec![msg.clone()],
        }
    }

    fn screen_text(screen: &mut DashboardScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 24)).unwrap();
        terminal
            .draw(|frame| screen.render(frame, frame.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn shows_loading_until_first_load() {
        let mut screen = DashboardScreen::new(Palette::DARK);
        screen
            .update(&Action::LoadStateChanged(LoadState::Loading))
            .unwrap();
        assert_eq!(screen.body, TableBody::loading());
        assert_eq!(screen.count, None);
        assert!(screen_text(&mut screen).contains("Loading..."));
    }

    #[test]
    fn rows_are_newest_first_with_count() {
        let screen = loaded_screen();
        assert_eq!(vehicle_order(&screen), ["KA02CD5678", "KA01AB1234"]);
        assert_eq!(screen.count, Some((2, 2)));
        assert_eq!(screen.table_state.selected(), Some(0));
    }

    #[test]
    fn failure_replaces_table_with_message() {
        let mut screen = loaded_screen();
        screen
            .update(&Action::LoadStateChanged(LoadState::Failed(LoadFailure::Network)))
            .unwrap();
        assert_eq!(screen.body, TableBody::from_failure(LoadFailure::Network));
        assert_eq!(screen.table_state.selected(), None);
        assert!(screen_text(&mut screen).contains("Is the API running?"));
    }

    #[test]
    fn status_key_cycles_the_selector() {
        let mut screen = loaded_screen();
        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('s')))
            .unwrap()
            .unwrap();
        screen.update(&action).unwrap();
        assert_eq!(screen.status, StatusFilter::Inside);
        assert_eq!(vehicle_order(&screen), ["KA01AB1234"]);
        assert_eq!(screen.count, Some((1, 2)));
        match &screen.body {
            TableBody::Rows(rows) => assert_eq!(rows[0].status, EntryStatus::Inside),
            TableBody::Placeholder(_) => panic!("expected rows"),
        }
    }

    #[test]
    fn search_narrows_and_close_restores() {
        let mut screen = loaded_screen();
        screen
            .update(&Action::SearchInput("ka02".into()))
            .unwrap();
        assert_eq!(vehicle_order(&screen), ["KA02CD5678"]);
        screen.update(&Action::CloseSearch).unwrap();
        assert_eq!(screen.count, Some((2, 2)));
    }

    #[test]
    fn statistics_rebuild_the_chart() {
        let mut screen = DashboardScreen::new(Palette::DARK);
        let stats = Statistics {
            total_entries: 4,
            open_entries: 1,
            closed_entries: 3,
            unique_vehicles: 2,
        };
        screen.update(&Action::StatisticsUpdated(stats)).unwrap();
        assert_eq!(
            screen.chart.get(),
            Some(&OccupancyChart::new(ChartSlices { inside: 1, exited: 3 }))
        );
        let text = screen_text(&mut screen);
        assert!(text.contains("Unique Vehicles"));
        assert!(text.contains("Inside 1"));
    }

    #[test]
    fn selection_moves_within_bounds() {
        let mut screen = loaded_screen();
        screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('j')))
            .unwrap();
        screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('j')))
            .unwrap();
        assert_eq!(screen.table_state.selected(), Some(1));
        screen.handle_key_event(KeyEvent::from(KeyCode::Up)).unwrap();
        assert_eq!(screen.table_state.selected(), Some(0));
    }
}
