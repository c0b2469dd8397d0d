use crate::app::{App, InputMode, View};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::styles;

pub fn render_top_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            " cxv ",
            Style::default()
                .fg(styles::BG)
                .bg(styles::BLUE)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", app.view.label()),
            Style::default().fg(styles::BRIGHT).add_modifier(Modifier::BOLD),
        ),
    ];

    match app.view {
        View::Intake => {
            spans.push(Span::styled(
                format!(" {} file(s) selected", app.candidates.len()),
                Style::default().fg(styles::MUTED),
            ));
            if !app.filter_expr.is_empty() {
                spans.push(Span::styled(
                    format!("  filter: {}", app.filter_expr),
                    Style::default().fg(styles::DIM),
                ));
            }
        }
        View::Results => {
            spans.push(Span::styled(
                format!(
                    " {} file(s) · {} finding(s)",
                    app.reconciler.files().len(),
                    app.reconciler.total_findings()
                ),
                Style::default().fg(styles::MUTED),
            ));
            if !app.snapshot_created_at.is_empty() {
                spans.push(Span::styled(
                    format!("  analysed {}", app.snapshot_created_at),
                    Style::default().fg(styles::DIM),
                ));
            }
        }
    }

    let bar = Paragraph::new(Line::from(spans)).style(styles::surface_style());
    f.render_widget(bar, area);
}

pub fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App) {
    // Notification takes the whole bar while visible
    if let Some(ref message) = app.notification {
        let bar = Paragraph::new(Line::from(vec![Span::styled(
            format!(" {}", message),
            Style::default().fg(styles::GREEN),
        )]))
        .style(styles::surface_style());
        f.render_widget(bar, area);
        return;
    }

    let hints: &[(&str, &str)] = match (app.view, app.input_mode) {
        (_, InputMode::Filter) => &[("Enter", "apply"), ("Esc", "cancel")],
        (View::Intake, _) => &[
            ("a", "analyse"),
            ("j/k", "move"),
            ("d", "remove"),
            ("f", "filter"),
            ("r", "stored results"),
            ("q", "quit"),
        ],
        (View::Results, _) => &[
            ("h/l", "switch file"),
            ("j/k", "finding"),
            ("C-d/C-u", "scroll"),
            ("b", "back"),
            ("q", "quit"),
        ],
    };

    let mut spans: Vec<Span> = Vec::new();
    for (key, action) in hints {
        spans.push(Span::styled(format!(" {}", key), styles::key_hint_style()));
        spans.push(Span::styled(
            format!(" {}  ", action),
            Style::default().fg(styles::DIM),
        ));
    }

    let bar = Paragraph::new(Line::from(spans)).style(styles::surface_style());
    f.render_widget(bar, area);
}
