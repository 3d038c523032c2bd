use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};
use crate::ui::theme::label_color;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let (title, prefix) = match app.mode {
        InputMode::AddTicket => {
            let label = &app.new_label;
            (
                " New Ticket — enter: submit  tab: label  esc: cancel ".to_string(),
                Some(Span::styled(
                    format!("[{label}] "),
                    Style::default().fg(label_color(label)),
                )),
            )
        }
        InputMode::EditTitle => {
            let id = app
                .selected_ticket()
                .map(|t| t.id.to_string())
                .unwrap_or_default();
            (format!(" Edit {id} — enter: save  esc: cancel "), None)
        }
        InputMode::Table => return,
    };

    let offset = cursor_offset(prefix.as_ref(), &app.input_buffer, app.input_cursor);
    let mut spans = Vec::new();
    spans.extend(prefix);
    spans.push(Span::raw(app.input_buffer.clone()));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ratatui::style::Color::Yellow))
        .title(title);

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    f.render_widget(paragraph, area);

    // Position cursor
    let x = area.x + 1 + offset as u16;
    let y = area.y + 1;
    f.set_cursor_position((x.min(area.x + area.width.saturating_sub(2)), y));
}

/// Terminal columns between the start of the line and the cursor, which sits
/// before char `cursor` of `buffer`. Wide glyphs take two columns.
fn cursor_offset(prefix: Option<&Span>, buffer: &str, cursor: usize) -> usize {
    let before: String = buffer.chars().take(cursor).collect();
    prefix.map_or(0, Span::width) + Span::raw(before).width()
}
