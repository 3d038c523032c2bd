pub mod footer;
pub mod input_bar;
pub mod stats_panel;
pub mod theme;
pub mod ticket_table;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;

pub fn render(f: &mut Frame, app: &App) {
    let size = f.area();

    // Bottom bar: input form (3) while typing, else footer (1)
    let bottom_height = if app.input_active() { 3 } else { 1 };

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),                // main content
            Constraint::Length(bottom_height), // footer or input bar
        ])
        .split(size);

    // Tickets (60%) + Statistics (40%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(vertical[0]);

    ticket_table::render(f, horizontal[0], app);
    stats_panel::render(f, horizontal[1], app);

    if app.input_active() {
        input_bar::render(f, vertical[1], app);
    } else {
        footer::render(f, vertical[1], app);
    }
}
