use crate::model::Severity;
use ratatui::style::{Color, Modifier, Style};

// ── Background colors ──
pub const BG: Color = Color::Rgb(12, 12, 12);
pub const SURFACE: Color = Color::Rgb(20, 20, 20);
pub const BORDER: Color = Color::Rgb(42, 42, 42);

// ── Text colors ──
pub const TEXT: Color = Color::Rgb(200, 200, 200);
pub const DIM: Color = Color::Rgb(102, 102, 102);
pub const MUTED: Color = Color::Rgb(136, 136, 136);
pub const BRIGHT: Color = Color::Rgb(232, 232, 232);

// ── Accent colors ──
pub const BLUE: Color = Color::Rgb(96, 165, 250);
pub const GREEN: Color = Color::Rgb(74, 222, 128);
pub const YELLOW: Color = Color::Rgb(250, 204, 21);
pub const RED: Color = Color::Rgb(248, 113, 113);

pub const LINE_CURSOR_BG: Color = Color::Rgb(26, 42, 58);

// ── Composed styles ──

pub fn default_style() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn surface_style() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn selected_style() -> Style {
    Style::default().fg(BLUE).bg(LINE_CURSOR_BG)
}

pub fn key_hint_style() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::BOLD)
}

pub fn error_style() -> Style {
    Style::default().fg(RED).add_modifier(Modifier::BOLD)
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::High => RED,
        Severity::Medium => YELLOW,
        Severity::Low => GREEN,
    }
}

pub fn severity_fg(severity: Severity) -> Style {
    Style::default()
        .fg(severity_color(severity))
        .add_modifier(Modifier::BOLD)
}

/// Score badges: dark text on the band color, like the web badges
pub fn severity_badge(severity: Severity) -> Style {
    Style::default()
        .fg(BG)
        .bg(severity_color(severity))
        .add_modifier(Modifier::BOLD)
}

/// Badge style for "no data" summaries
pub fn neutral_badge() -> Style {
    Style::default().fg(BRIGHT).bg(BORDER).add_modifier(Modifier::BOLD)
}
