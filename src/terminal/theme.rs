use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Indexed(45);
pub const BORDER: Color = Color::Indexed(99);
pub const HEADER: Color = Color::Indexed(51);
pub const SELECTED: Color = Color::Indexed(201);
pub const MUTED: Color = Color::Indexed(240);
pub const STATUS: Color = Color::Indexed(42);
pub const MODAL_BG: Color = Color::Indexed(235);
pub const MODAL_FG: Color = Color::Indexed(255);

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}

pub fn header() -> Style {
    Style::default().fg(HEADER).add_modifier(Modifier::BOLD)
}

pub fn selected() -> Style {
    Style::default().fg(SELECTED).add_modifier(Modifier::BOLD)
}

pub fn help() -> Style {
    Style::default().fg(MUTED)
}

pub fn status() -> Style {
    Style::default().fg(STATUS).add_modifier(Modifier::BOLD)
}

pub fn error() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub fn modal() -> Style {
    Style::default().fg(MODAL_FG).bg(MODAL_BG)
}
