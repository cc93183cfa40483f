use ratatui::style::{Color, Modifier, Style};

/// Page color behind the heatmap; white, as on a GitHub profile
pub(crate) const BACKGROUND: Color = Color::Rgb(0xFF, 0xFF, 0xFF);

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::Black).bg(BACKGROUND);

pub(crate) const USERNAME_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const LOADING_STYLE: Style = BASE_STYLE
    .fg(Color::Rgb(0x96, 0x96, 0x96))
    .add_modifier(Modifier::ITALIC);

pub(crate) const ERROR_STYLE: Style = BASE_STYLE
    .fg(Color::Rgb(0xCB, 0x24, 0x31))
    .add_modifier(Modifier::BOLD);

pub(crate) const HINT_STYLE: Style = BASE_STYLE.fg(Color::Rgb(0x76, 0x76, 0x76));
