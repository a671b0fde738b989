//! Application core: event loop, global keys, action dispatch.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use gatelog_config::UiState;
use gatelog_core::{
    ExportError, LoadState, Loader, RefreshOutcome, ThemeMode, VehicleSource, export,
    spawn_refresh_task,
};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, spawn_event_pump};
use crate::screens::DashboardScreen;
use crate::theme::{self, Palette};
use crate::tui::TerminalSession;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App<S> {
    loader: Loader<S>,
    screen: DashboardScreen,
    running: bool,
    theme: ThemeMode,
    /// Mirrors the store, for the status bar.
    load_state: LoadState,
    help_visible: bool,
    search_active: bool,
    /// Query being typed; pushed to the screen on every keystroke.
    search_query: String,
    export_dir: PathBuf,
    /// Where the theme choice is persisted.
    state_path: PathBuf,
    refresh_period: Duration,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Stops the refresh task and the data bridge.
    cancel: CancellationToken,
    notification: Option<(Notification, Instant)>,
}

impl<S: VehicleSource> App<S> {
    pub fn new(
        loader: Loader<S>,
        theme: ThemeMode,
        export_dir: PathBuf,
        state_path: PathBuf,
        refresh_period: Duration,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            loader,
            screen: DashboardScreen::new(Palette::for_mode(theme)),
            running: true,
            theme,
            load_state: LoadState::Idle,
            help_visible: false,
            search_active: false,
            search_query: String::new(),
            export_dir,
            state_path,
            refresh_period,
            action_tx,
            action_rx,
            cancel: CancellationToken::new(),
            notification: None,
        }
    }

    fn palette(&self) -> Palette {
        Palette::for_mode(self.theme)
    }

    /// Run until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut session = TerminalSession::start()?;

        let (event_tx, mut events) = mpsc::unbounded_channel();
        let pump = spawn_event_pump(event_tx, self.cancel.clone());
        let refresh = spawn_refresh_task(
            self.loader.clone(),
            self.refresh_period,
            self.cancel.clone(),
        );
        let bridge = tokio::spawn(spawn_data_bridge(
            Arc::clone(self.loader.store()),
            self.action_tx.clone(),
            self.cancel.clone(),
        ));

        info!(period = ?self.refresh_period, "dashboard started");

        while self.running {
            let Some(event) = events.recv().await else {
                break;
            };
            if let Some(action) = self.action_for(event)? {
                self.action_tx.send(action)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    session.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.cancel.cancel();
        let _ = tokio::join!(pump, refresh, bridge);
        drop(session);
        info!("dashboard stopped");
        Ok(())
    }

    fn action_for(&mut self, event: Event) -> Result<Option<Action>> {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Resize(w, h) => Ok(Some(Action::Resize(w, h))),
            Event::Tick => Ok(Some(Action::Tick)),
            Event::Render => Ok(Some(Action::Render)),
        }
    }

    /// Map a key to an action. Overlays capture input first; everything
    /// not handled globally goes to the dashboard.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.search_active {
            return Ok(match key.code {
                KeyCode::Esc => {
                    self.search_query.clear();
                    Some(Action::CloseSearch)
                }
                KeyCode::Enter => Some(Action::SearchSubmit),
                KeyCode::Backspace => {
                    self.search_query.pop();
                    Some(Action::SearchInput(self.search_query.clone()))
                }
                KeyCode::Char(c) => {
                    self.search_query.push(c);
                    Some(Action::SearchInput(self.search_query.clone()))
                }
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                return Ok(Some(Action::ToggleHelp));
            }
            (KeyModifiers::NONE, KeyCode::Char('/')) => return Ok(Some(Action::OpenSearch)),
            (KeyModifiers::NONE, KeyCode::Esc) if !self.search_query.is_empty() => {
                self.search_query.clear();
                return Ok(Some(Action::CloseSearch));
            }
            _ => {}
        }

        self.screen.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            // The query is kept so editing resumes where it stopped.
            Action::OpenSearch => self.search_active = true,
            Action::SearchSubmit => self.search_active = false,
            Action::CloseSearch => {
                self.search_active = false;
                self.search_query.clear();
            }

            Action::RequestRefresh => self.spawn_refresh(),

            // Charts are rebuilt from fresh data in the new palette.
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                if let Err(e) = (UiState { theme: self.theme }).save_to(&self.state_path) {
                    warn!(error = %e, "failed to persist theme");
                }
                self.spawn_refresh();
                self.action_tx.send(Action::ThemeChanged(self.theme))?;
                self.action_tx
                    .send(Action::Notify(Notification::info(format!(
                        "Theme: {}",
                        self.theme
                    ))))?;
            }

            Action::RequestExport => {
                let notification = self.export();
                self.action_tx.send(Action::Notify(notification))?;
            }

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }

            Action::LoadStateChanged(state) => self.load_state = *state,

            _ => {}
        }

        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    /// Manual refresh. Overlapping requests are coalesced by the loader.
    fn spawn_refresh(&self) {
        let loader = self.loader.clone();
        tokio::spawn(async move {
            match loader.refresh().await {
                Ok(RefreshOutcome::Coalesced) => debug!("manual refresh coalesced"),
                Ok(RefreshOutcome::Refreshed { vehicles }) => {
                    debug!(vehicles, "manual refresh done");
                }
                Err(e) => debug!(error = %e, "manual refresh failed"),
            }
        });
    }

    /// Write every loaded entry to today's CSV file.
    fn export(&self) -> Notification {
        let snapshot = self.loader.store().vehicles_snapshot();
        let today = Local::now().date_naive();
        match export::write_export(&self.export_dir, &snapshot, today) {
            Ok(path) => Notification::success(format!(
                "Exported {} entries to {}",
                snapshot.len(),
                path.display()
            )),
            Err(ExportError::Empty) => Notification::warning("No data to export"),
            Err(e) => {
                warn!(error = %e, "export failed");
                Notification::warning(e.to_string())
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let palette = self.palette();
        frame.render_widget(Block::default().style(palette.base()), area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        self.screen.render(frame, layout[0]);
        self.render_status_bar(frame, layout[1], &palette);

        if let Some((ref notification, _)) = self.notification {
            render_notification(frame, area, notification, &palette);
        }

        if self.help_visible {
            render_help_overlay(frame, area, &palette);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        if self.search_active {
            let line = Line::from(vec![
                Span::styled(" / ", palette.key_hint_key()),
                Span::styled(self.search_query.as_str(), palette.table_row()),
                Span::styled("█", Style::default().fg(palette.accent)),
                Span::styled("  Esc clear  Enter apply", palette.key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let indicator = match self.load_state {
            LoadState::Idle => Span::styled("○ idle", palette.key_hint()),
            LoadState::Loading => Span::styled("◐ loading", Style::default().fg(theme::AMBER)),
            LoadState::Ready => Span::styled("● live", Style::default().fg(theme::GREEN)),
            LoadState::Failed(_) => Span::styled("✗ offline", Style::default().fg(theme::ERROR_RED)),
        };

        let age = self
            .loader
            .store()
            .data_age()
            .and_then(|d| d.to_std().ok())
            .map_or_else(
                || "never updated".to_owned(),
                |d| {
                    let secs = Duration::from_secs(d.as_secs());
                    format!("updated {} ago", humantime::format_duration(secs))
                },
            );

        let cadence = if self.refresh_period.is_zero() {
            "auto-refresh off".to_owned()
        } else {
            format!(
                "every {}",
                humantime::format_duration(self.refresh_period)
            )
        };

        let line = Line::from(vec![
            Span::raw(" "),
            indicator,
            Span::styled(format!(" │ {age} ({cadence})"), palette.key_hint()),
            Span::styled(
                " │ / search  s status  r refresh  e export  t theme  ? help  q quit",
                palette.key_hint(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn render_help_overlay(frame: &mut Frame, area: Rect, palette: &Palette) {
    let help_area = centered(area, 52, 16);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(palette.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border_focused())
        .style(Style::default().bg(palette.surface));

    let keys = [
        ("/", "Search vehicle, visitor, phone, purpose"),
        ("Esc", "Clear search"),
        ("s", "Cycle status: all / inside / exited"),
        ("j k", "Move selection"),
        ("r", "Refresh now"),
        ("e", "Export loaded entries to CSV"),
        ("t", "Toggle dark / light theme"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ];

    let mut lines = vec![Line::from("")];
    lines.extend(keys.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(format!("  {key:<8}"), palette.key_hint_key()),
            Span::styled(*desc, palette.key_hint()),
        ])
    }));

    frame.render_widget(Paragraph::new(lines).block(block), help_area);
}

fn render_notification(
    frame: &mut Frame,
    area: Rect,
    notification: &Notification,
    palette: &Palette,
) {
    let msg_len = u16::try_from(notification.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len
        .saturating_add(6)
        .clamp(20, 72)
        .min(area.width.saturating_sub(2));
    let height = 3;
    let x = area.x + area.width.saturating_sub(width + 1);
    let y = area.y + area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(x, y, width, height);

    let (color, icon) = match notification.level {
        NotificationLevel::Success => (theme::GREEN, "✓"),
        NotificationLevel::Warning => (theme::AMBER, "!"),
        NotificationLevel::Info => (palette.accent, "·"),
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(palette.surface));

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(notification.message.as_str(), palette.table_row()),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), toast_area);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use gatelog_api::{RawStatistics, RawVehicle, VehicleHistory};
    use gatelog_core::DataStore;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[derive(Default)]
    struct StaticSource {
        vehicles: Vec<RawVehicle>,
        fetches: AtomicUsize,
    }

    impl VehicleSource for StaticSource {
        async fn fetch_statistics(&self) -> Result<RawStatistics, gatelog_api::Error> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(RawStatistics {
                total_entries: u64::try_from(self.vehicles.len()).unwrap(),
                ..RawStatistics::default()
            })
        }

        async fn fetch_vehicles(&self) -> Result<Vec<RawVehicle>, gatelog_api::Error> {
            Ok(self.vehicles.clone())
        }

        async fn fetch_history(
            &self,
            _vehicle_no: &str,
        ) -> Result<VehicleHistory, gatelog_api::Error> {
            Err(gatelog_api::Error::Http {
                status: 404,
                message: "no history".into(),
            })
        }
    }

    fn inside(no: &str) -> RawVehicle {
        RawVehicle {
            vehicle_no: no.into(),
            visitor_name: Some("Asha Rao".into()),
            phone: None,
            purpose: Some("Delivery".into()),
            in_time: "2024-03-05 09:15:00".into(),
            out_time: None,
            image_path: None,
        }
    }

    fn app(source: StaticSource, dir: &TempDir) -> App<StaticSource> {
        std::fs::create_dir(dir.path().join("exports")).unwrap();
        App::new(
            Loader::new(source, Arc::new(DataStore::new())),
            ThemeMode::Dark,
            dir.path().join("exports"),
            dir.path().join("state.toml"),
            Duration::ZERO,
        )
    }

    fn drain(app: &mut App<StaticSource>) -> Vec<Action> {
        std::iter::from_fn(|| app.action_rx.try_recv().ok()).collect()
    }

    #[tokio::test]
    async fn theme_toggle_persists_announces_and_reloads() {
        let dir = TempDir::new().unwrap();
        let mut app = app(StaticSource::default(), &dir);

        app.process_action(&Action::ToggleTheme).unwrap();

        assert_eq!(app.theme, ThemeMode::Light);
        let saved = UiState::load_from(&dir.path().join("state.toml")).unwrap();
        assert_eq!(saved.theme, ThemeMode::Light);

        let actions = drain(&mut app);
        assert!(matches!(actions[0], Action::ThemeChanged(ThemeMode::Light)));
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::Notify(n) if n.message == "Theme: light" && n.level == NotificationLevel::Info
        )));

        tokio::time::timeout(Duration::from_secs(1), async {
            while app.loader.source().fetches.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn second_toggle_restores_dark() {
        let dir = TempDir::new().unwrap();
        let mut app = app(StaticSource::default(), &dir);

        app.process_action(&Action::ToggleTheme).unwrap();
        app.process_action(&Action::ToggleTheme).unwrap();

        let saved = UiState::load_from(&dir.path().join("state.toml")).unwrap();
        assert_eq!(saved.theme, ThemeMode::Dark);
        let changes: Vec<ThemeMode> = drain(&mut app)
            .into_iter()
            .filter_map(|a| match a {
                Action::ThemeChanged(mode) => Some(mode),
                _ => None,
            })
            .collect();
        assert_eq!(changes, [ThemeMode::Light, ThemeMode::Dark]);
    }

    #[tokio::test]
    async fn export_with_nothing_loaded_warns_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut app = app(StaticSource::default(), &dir);

        app.process_action(&Action::RequestExport).unwrap();

        let toast = drain(&mut app)
            .into_iter()
            .find_map(|a| match a {
                Action::Notify(n) => Some(n),
                _ => None,
            })
            .unwrap();
        assert_eq!(toast, Notification::warning("No data to export"));
        let written = std::fs::read_dir(dir.path().join("exports")).unwrap();
        assert_eq!(written.count(), 0);

        app.process_action(&Action::Notify(toast)).unwrap();
        let (shown, _) = app.notification.as_ref().unwrap();
        assert_eq!(shown.level, NotificationLevel::Warning);
    }

    #[tokio::test]
    async fn export_after_refresh_writes_todays_file() {
        let dir = TempDir::new().unwrap();
        let source = StaticSource {
            vehicles: vec![inside("KA01AB1234"), inside("KA03EF9012")],
            ..StaticSource::default()
        };
        let app = app(source, &dir);
        app.loader.refresh().await.unwrap();

        let toast = app.export();

        assert_eq!(toast.level, NotificationLevel::Success);
        assert!(toast.message.starts_with("Exported 2 entries to "));
        let written: Vec<_> = std::fs::read_dir(dir.path().join("exports"))
            .unwrap()
            .collect();
        assert_eq!(written.len(), 1);
    }

    #[tokio::test]
    async fn pacing_events_become_actions() {
        let dir = TempDir::new().unwrap();
        let mut app = app(StaticSource::default(), &dir);

        assert!(matches!(app.action_for(Event::Tick).unwrap(), Some(Action::Tick)));
        assert!(matches!(app.action_for(Event::Render).unwrap(), Some(Action::Render)));
        assert!(matches!(
            app.action_for(Event::Resize(100, 30)).unwrap(),
            Some(Action::Resize(100, 30))
        ));
        let quit = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(matches!(app.action_for(Event::Key(quit)).unwrap(), Some(Action::Quit)));
    }
}
