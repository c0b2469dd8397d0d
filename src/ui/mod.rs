pub mod highlight;
mod intake_view;
mod results_view;
mod status_bar;
mod styles;
mod utils;

use crate::app::{App, View};
use highlight::Highlighter;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

/// Render the entire UI
pub fn draw(f: &mut Frame, app: &App, hl: &Highlighter) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // top bar
            Constraint::Min(1),    // main content
            Constraint::Length(1), // bottom bar
        ])
        .split(f.area());

    status_bar::render_top_bar(f, outer[0], app);

    match app.view {
        View::Intake => intake_view::render(f, outer[1], app),
        View::Results => results_view::render(f, outer[1], app, hl),
    }

    status_bar::render_bottom_bar(f, outer[2], app);
}
