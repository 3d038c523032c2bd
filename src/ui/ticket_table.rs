use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::theme::{label_color, status_color, ACCENT};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(["ID", "Issue", "Status", "Label", "Submitted"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .tickets()
        .iter()
        .map(|ticket| {
            Row::new(vec![
                Cell::from(Span::styled(
                    ticket.id.to_string(),
                    Style::default().fg(ratatui::style::Color::DarkGray),
                )),
                Cell::from(ticket.title.as_str()),
                Cell::from(Span::styled(
                    ticket.status.as_str(),
                    Style::default().fg(status_color(ticket.status)),
                )),
                Cell::from(Span::styled(
                    ticket.label.as_str(),
                    Style::default().fg(label_color(&ticket.label)),
                )),
                Cell::from(ticket.date_submitted.to_string()),
            ])
        })
        .collect();

    let title = if app.loading {
        " Tickets (loading...) ".to_string()
    } else {
        format!(" Tickets ({}) ", app.tickets().len())
    };

    let widths = [
        Constraint::Length(10),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(title),
        )
        .row_highlight_style(
            Style::default()
                .fg(ACCENT)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );

    let mut state = TableState::default();
    if !app.tickets().is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(table, area, &mut state);
}
