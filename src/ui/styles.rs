// Allow dead code: Style functions defined for consistent UI
#![allow(dead_code)]

use ratatui::style::{Color, Modifier, Style};

use crate::models::ReservationStatus;

// Color palette
pub const PRIMARY: Color = Color::Rgb(86, 156, 214);
pub const SECONDARY: Color = Color::Rgb(106, 176, 112);
pub const ACCENT: Color = Color::Rgb(214, 178, 80);
pub const ERROR: Color = Color::Rgb(205, 92, 92);
pub const MUTED: Color = Color::Rgb(120, 120, 130);
pub const HIGHLIGHT: Color = Color::Rgb(52, 56, 72);
pub const STATUS_BG: Color = Color::Rgb(36, 38, 48);

pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn search_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn status_bar_style() -> Style {
    Style::default().bg(STATUS_BG).fg(Color::Gray)
}

/// Selected tabs get the primary color and an underline
pub fn tab_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::Gray)
    }
}

/// Border color tracks panel focus
pub fn border_style(focused: bool) -> Style {
    let color = if focused { PRIMARY } else { MUTED };
    Style::default().fg(color)
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Color for a reservation status badge
pub fn status_style(status: ReservationStatus) -> Style {
    let color = match status {
        ReservationStatus::Pending => ACCENT,
        ReservationStatus::Confirmed => SECONDARY,
        ReservationStatus::Cancelled => ERROR,
        ReservationStatus::Completed => MUTED,
    };
    Style::default().fg(color)
}
