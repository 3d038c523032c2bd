use ratatui::style::Color;

use crate::model::ticket::{Label, Status};

pub const ACCENT: Color = Color::Cyan;

pub fn status_color(status: Status) -> Color {
    match status {
        Status::Open => Color::Green,
        Status::InProgress => Color::Yellow,
        Status::Closed => Color::DarkGray,
    }
}

pub fn label_color(label: &Label) -> Color {
    match label {
        Label::Bug => Color::Red,
        Label::Credential => Color::Rgb(0xCE, 0x93, 0xD8),
        Label::Feature => Color::Rgb(0x4F, 0xC3, 0xF7),
        Label::Enhancement => Color::Rgb(0x81, 0xC7, 0x84),
        Label::Other(_) => Color::Gray,
    }
}
