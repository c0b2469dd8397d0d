use crate::app::{App, InputMode};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};
use ratatui::Frame;

use super::styles;

const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// File selection screen: candidate list, filter, analyse prompt.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        " Code Complexity Analyser",
        Style::default().fg(styles::BRIGHT).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        " Pick source files and get per-finding complexity insights",
        Style::default().fg(styles::MUTED),
    )));
    lines.push(Line::from(""));

    if app.candidates.is_empty() {
        lines.push(Line::from(Span::styled(
            " No files selected — pass paths on the command line (cxv src/),",
            Style::default().fg(styles::DIM),
        )));
        lines.push(Line::from(Span::styled(
            " or loosen the filter with f.",
            Style::default().fg(styles::DIM),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            " Selected files",
            Style::default().fg(styles::MUTED).add_modifier(Modifier::BOLD),
        )));
        for (idx, record) in app.candidates.iter().enumerate() {
            let is_selected = idx == app.selected_candidate;
            let prefix = if is_selected { "▸" } else { " " };
            let name_style = if is_selected {
                styles::selected_style().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(styles::TEXT)
            };
            lines.push(Line::from(vec![
                Span::styled(format!(" {} ", prefix), name_style),
                Span::styled(record.file_name.clone(), name_style),
                Span::styled(
                    format!("  {} lines", record.file_content.lines().count()),
                    Style::default().fg(styles::DIM),
                ),
            ]));
        }
    }

    lines.push(Line::from(""));

    // Filter input while typing
    if app.input_mode == InputMode::Filter {
        lines.push(Line::from(vec![
            Span::styled(" filter: ", styles::key_hint_style()),
            Span::styled(
                format!("{}▏", app.filter_input),
                Style::default().fg(styles::BRIGHT),
            ),
        ]));
        lines.push(Line::from(""));
    }

    if app.loading {
        let spinner = SPINNER[app.frame % SPINNER.len()];
        lines.push(Line::from(Span::styled(
            format!(" {} Analysing {} file(s)...", spinner, app.candidates.len()),
            Style::default().fg(styles::BLUE).add_modifier(Modifier::BOLD),
        )));
    }

    if let Some(ref error) = app.error {
        for wrapped in super::utils::word_wrap(error, area.width.saturating_sub(4) as usize) {
            lines.push(Line::from(Span::styled(
                format!(" {}", wrapped),
                styles::error_style(),
            )));
        }
        lines.push(Line::from(Span::styled(
            " (Esc to dismiss)",
            Style::default().fg(styles::DIM),
        )));
    }

    let block = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(styles::BG))
        .padding(Padding::new(1, 1, 1, 0));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
