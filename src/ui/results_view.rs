use crate::app::App;
use crate::model::Severity;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};
use ratatui::Frame;
use std::collections::HashMap;

use super::highlight::Highlighter;
use super::styles;
use super::utils::{truncate, word_wrap};

/// Two-pane results screen: highlighted code on the left, file summary
/// plus finding list on the right.
pub fn render(f: &mut Frame, area: Rect, app: &App, hl: &Highlighter) {
    if !app.reconciler.has_data() {
        render_no_results(f, area);
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(3), Constraint::Fill(2)])
        .split(area);

    render_code_pane(f, cols[0], app, hl);
    render_findings_pane(f, cols[1], app);
}

/// Guard for a missing or cleared snapshot — guidance, never an error.
fn render_no_results(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " No results found. Run an analysis first.",
            Style::default().fg(styles::MUTED),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" b", styles::key_hint_style()),
            Span::styled(" back to intake", Style::default().fg(styles::DIM)),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(styles::BG))
        .padding(Padding::new(1, 1, 1, 0));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

// ── Left pane: tabs + code ──

fn render_code_pane(f: &mut Frame, area: Rect, app: &App, hl: &Highlighter) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    render_tab_strip(f, rows[0], app);
    render_code(f, rows[1], app, hl);
}

fn render_tab_strip(f: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = Vec::new();
    let active = usize::try_from(app.reconciler.selected()).ok();

    for (idx, record) in app.reconciler.files().iter().enumerate() {
        let is_active = active == Some(idx);
        let label = format!(" {} ", truncate(&record.file_name, 24));
        let style = if is_active {
            Style::default()
                .fg(styles::BG)
                .bg(styles::BLUE)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(styles::MUTED).bg(styles::SURFACE)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    let strip = Paragraph::new(Line::from(spans)).style(styles::surface_style());
    f.render_widget(strip, area);
}

fn render_code(f: &mut Frame, area: Rect, app: &App, hl: &Highlighter) {
    let Some(record) = app.reconciler.active_file() else {
        // Selection can be invalid while files exist; stay neutral
        let msg = Paragraph::new(Line::from(Span::styled(
            " No file selected",
            Style::default().fg(styles::MUTED),
        )))
        .style(styles::default_style());
        f.render_widget(msg, area);
        return;
    };

    // Highest severity per line, for the gutter markers
    let mut line_severity: HashMap<u32, Severity> = HashMap::new();
    for finding in app.reconciler.findings_for_active() {
        let severity = Severity::band(finding.complexity);
        line_severity
            .entry(finding.line_number)
            .and_modify(|existing| {
                if severity_rank(severity) > severity_rank(*existing) {
                    *existing = severity;
                }
            })
            .or_insert(severity);
    }
    let cursor_line = app.cursor_line();

    let tab = " ".repeat(app.config.display.tab_width as usize);
    let total_lines = record.file_content.lines().count();
    let number_width = total_lines.max(1).to_string().len();

    let mut lines: Vec<Line> = Vec::new();
    for (idx, raw) in record.file_content.lines().enumerate() {
        let line_no = idx as u32 + 1;
        let is_cursor = cursor_line == Some(line_no);
        let base = if is_cursor {
            Style::default().bg(styles::LINE_CURSOR_BG)
        } else {
            Style::default().bg(styles::BG)
        };

        let mut spans: Vec<Span> = Vec::new();
        match line_severity.get(&line_no) {
            Some(&severity) => {
                spans.push(Span::styled("●", styles::severity_fg(severity).bg(
                    if is_cursor { styles::LINE_CURSOR_BG } else { styles::BG },
                )));
            }
            None => spans.push(Span::styled(" ", base)),
        }
        if app.config.display.line_numbers {
            spans.push(Span::styled(
                format!(" {:>width$} ", line_no, width = number_width),
                base.fg(styles::DIM),
            ));
        } else {
            spans.push(Span::styled(" ", base));
        }

        let expanded = raw.replace('\t', &tab);
        spans.extend(hl.highlight_line(&expanded, &record.file_name, base));
        lines.push(Line::from(spans));
    }

    let block = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(styles::BG));

    let mut paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.code_scroll, app.h_scroll));
    if app.config.display.wrap_lines {
        paragraph = paragraph.wrap(ratatui::widgets::Wrap { trim: false });
    }
    f.render_widget(paragraph, area);
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Low => 0,
        Severity::Medium => 1,
        Severity::High => 2,
    }
}

// ── Right pane: summary + findings ──

fn render_findings_pane(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(1)])
        .split(area);

    render_summary(f, rows[0], app);
    render_findings(f, rows[1], app);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let summary = app.reconciler.summary_for_active();
    let file_name = app
        .reconciler
        .active_file()
        .map(|r| r.file_name.clone())
        .unwrap_or_default();

    let badge_style = match summary.severity() {
        Some(severity) => styles::severity_badge(severity),
        None => styles::neutral_badge(),
    };

    let lines = vec![
        Line::from(Span::styled(
            " File Summary",
            Style::default().fg(styles::BRIGHT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {}  ", summary.mean_label()), badge_style),
            Span::styled(
                format!("  {}", file_name),
                Style::default().fg(styles::BRIGHT).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!(
                    "        {} complexity finding{}",
                    summary.count,
                    if summary.count == 1 { "" } else { "s" }
                ),
                Style::default().fg(styles::MUTED),
            ),
            Span::styled(
                format!(" · avg. score {}", summary.mean_label()),
                Style::default().fg(styles::DIM),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(styles::BORDER))
        .style(Style::default().bg(styles::SURFACE))
        .padding(Padding::new(0, 1, 0, 0));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_findings(f: &mut Frame, area: Rect, app: &App) {
    let findings = app.reconciler.findings_for_active();
    let max_w = area.width.saturating_sub(8) as usize;

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        " Complexity Findings",
        Style::default().fg(styles::BRIGHT).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    // First rendered line of each finding card, for cursor-follow scroll
    let mut card_starts: Vec<usize> = Vec::new();

    if findings.is_empty() {
        lines.push(Line::from(Span::styled(
            " No complexity results for this file.",
            Style::default().fg(styles::MUTED),
        )));
    } else {
        for (idx, finding) in findings.iter().enumerate() {
            card_starts.push(lines.len());
            let is_cursor = idx == app.findings_cursor;
            let severity = Severity::band(finding.complexity);
            let bg = if is_cursor { styles::LINE_CURSOR_BG } else { styles::SURFACE };
            let prefix = if is_cursor { "▸" } else { " " };

            lines.push(Line::from(vec![
                Span::styled(format!("{} ", prefix), Style::default().fg(styles::BLUE).bg(bg)),
                Span::styled(
                    format!(" {:.1} ", finding.complexity),
                    styles::severity_badge(severity),
                ),
                Span::styled(
                    format!(" {}", finding.complexity_header),
                    Style::default()
                        .fg(styles::BRIGHT)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            for wrapped in word_wrap(&finding.complexity_reasoning, max_w) {
                lines.push(Line::from(Span::styled(
                    format!("       {}", wrapped),
                    Style::default().fg(styles::MUTED).bg(bg),
                )));
            }
            lines.push(Line::from(Span::styled(
                format!("       Line {} · {}", finding.line_number, severity.label()),
                Style::default().fg(styles::DIM).bg(bg),
            )));
            lines.push(Line::from(""));
        }
    }

    // Keep the cursor's card in view
    let viewport = area.height.saturating_sub(1) as usize;
    let scroll = card_starts
        .get(app.findings_cursor)
        .map(|&start| start.saturating_sub(viewport / 2))
        .unwrap_or(0);

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(styles::BORDER))
        .style(Style::default().bg(styles::SURFACE))
        .padding(Padding::new(0, 1, 0, 0));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_rank_orders_bands() {
        assert!(severity_rank(Severity::High) > severity_rank(Severity::Medium));
        assert!(severity_rank(Severity::Medium) > severity_rank(Severity::Low));
    }
}
