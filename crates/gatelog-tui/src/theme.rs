//! Dark and light palettes plus semantic styles for the dashboard.

use ratatui::style::{Color, Modifier, Style};

use gatelog_core::{EntryStatus, ThemeMode};

// ── Core Palette ──────────────────────────────────────────────────────

pub const AMBER: Color = Color::Rgb(245, 158, 11); // #f59e0b
pub const GREEN: Color = Color::Rgb(34, 197, 94); // #22c55e
pub const ERROR_RED: Color = Color::Rgb(239, 68, 68); // #ef4444
pub const SKY: Color = Color::Rgb(56, 189, 248); // #38bdf8

/// Colors that change with the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub highlight: Color,
}

impl Palette {
    pub const DARK: Self = Self {
        bg: Color::Rgb(15, 23, 42),       // #0f172a
        surface: Color::Rgb(30, 41, 59),  // #1e293b
        text: Color::Rgb(226, 232, 240),  // #e2e8f0
        muted: Color::Rgb(148, 163, 184), // #94a3b8
        border: Color::Rgb(51, 65, 85),   // #334155
        accent: SKY,
        highlight: Color::Rgb(51, 65, 85),
    };

    pub const LIGHT: Self = Self {
        bg: Color::Rgb(248, 250, 252),      // #f8fafc
        surface: Color::Rgb(255, 255, 255), // #ffffff
        text: Color::Rgb(30, 41, 59),       // #1e293b
        muted: Color::Rgb(100, 116, 139),   // #64748b
        border: Color::Rgb(203, 213, 225),  // #cbd5e1
        accent: Color::Rgb(2, 132, 199),    // #0284c7
        highlight: Color::Rgb(226, 232, 240),
    };

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::DARK,
            ThemeMode::Light => Self::LIGHT,
        }
    }

    // ── Semantic Styles ───────────────────────────────────────────────

    /// Whole-screen background.
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    /// Title text for blocks/panels.
    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn table_header(&self) -> Style {
        Style::default()
            .fg(self.muted)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn table_row(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn table_selected(&self) -> Style {
        Style::default()
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn placeholder(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::ITALIC)
    }

    /// Key hint text (e.g., "q quit  ? help").
    pub fn key_hint(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Key hint key character.
    pub fn key_hint_key(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }
}

/// Badge color for an entry status; same in both themes.
pub fn status_color(status: EntryStatus) -> Color {
    match status {
        EntryStatus::Inside => AMBER,
        EntryStatus::Exited => GREEN,
    }
}
