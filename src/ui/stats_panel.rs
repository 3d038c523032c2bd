use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::model::ticket::Status;
use crate::stats;
use crate::ui::theme::{label_color, status_color, ACCENT};

const BAR: &str = "█";

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let tickets = app.tickets();
    // Room left for bars after the row label and count
    let bar_room = area.width.saturating_sub(22).max(1) as usize;

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("Open tickets: ", Style::default().fg(ratatui::style::Color::Gray)),
            Span::styled(
                stats::open_count(tickets).to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::raw(""),
        heading("Status per month"),
    ];

    let months = stats::status_by_month(tickets);
    let month_max = months.iter().map(|b| b.total()).max().unwrap_or(0);
    for bucket in &months {
        let mut spans = vec![Span::raw(format!("{} ", bucket.key()))];
        for status in Status::ALL {
            let n = scaled(bucket.count(status), month_max, bar_room);
            spans.push(Span::styled(
                BAR.repeat(n),
                Style::default().fg(status_color(status)),
            ));
        }
        spans.push(Span::raw(format!(" {}", bucket.total())));
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(
        Status::ALL
            .iter()
            .map(|s| Span::styled(format!("{BAR} {}  ", s.as_str()), Style::default().fg(status_color(*s))))
            .collect::<Vec<_>>(),
    ));

    lines.push(Line::raw(""));
    lines.push(heading("Labels"));
    let labels = stats::label_distribution(tickets);
    let label_max = labels.first().map(|(_, n)| *n).unwrap_or(0);
    for (label, count) in &labels {
        lines.push(Line::from(vec![
            Span::raw(format!("{:<12}", label.as_str())),
            Span::styled(
                BAR.repeat(scaled(*count, label_max, bar_room)),
                Style::default().fg(label_color(label)),
            ),
            Span::raw(format!(" {count}")),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .title(" Statistics "),
    );
    f.render_widget(paragraph, area);
}

fn heading(text: &str) -> Line<'static> {
    Line::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )
}

/// Bar length for `value` when `max` fills `room` cells. Non-zero values get at least one cell.
fn scaled(value: usize, max: usize, room: usize) -> usize {
    if value == 0 || max == 0 {
        return 0;
    }
    (value * room / max).max(1)
}

#[cfg(test)]
mod tests {
    use super::scaled;

    #[test]
    fn bars_scale_to_available_room() {
        assert_eq!(scaled(10, 10, 20), 20);
        assert_eq!(scaled(5, 10, 20), 10);
        assert_eq!(scaled(1, 100, 20), 1);
        assert_eq!(scaled(0, 10, 20), 0);
        assert_eq!(scaled(3, 0, 20), 0);
    }
}
