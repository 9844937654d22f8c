//! Colours, icons and the on/off switch for ANSI styling.

use std::fmt::Display;
use std::io::IsTerminal;

use crossterm::style::{style, Color, Stylize};

pub const RED: Color = Color::AnsiValue(196);
pub const ORANGE: Color = Color::AnsiValue(208);
pub const YELLOW: Color = Color::AnsiValue(226);
pub const GREEN: Color = Color::AnsiValue(46);
pub const CYAN: Color = Color::AnsiValue(51);
pub const BLUE: Color = Color::AnsiValue(33);
pub const PURPLE: Color = Color::AnsiValue(129);
pub const GRAY: Color = Color::AnsiValue(245);
pub const DARK_GRAY: Color = Color::AnsiValue(238);
pub const WHITE: Color = Color::AnsiValue(15);

pub const BG_BLUE: Color = Color::AnsiValue(17);
pub const BG_RED: Color = Color::AnsiValue(52);
pub const BG_GREEN: Color = Color::AnsiValue(22);
pub const BG_YELLOW: Color = Color::AnsiValue(58);

/// Whether output carries ANSI colour and screen-control sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    color: bool,
}

impl Theme {
    pub fn colored() -> Self {
        Self { color: true }
    }

    /// No escape sequences at all (pipes, tests, `NO_COLOR`)
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Colour when stdout is a terminal and `NO_COLOR` is unset
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            color: !no_color && std::io::stdout().is_terminal(),
        }
    }

    pub fn is_colored(&self) -> bool {
        self.color
    }

    pub fn fg(&self, text: impl Display, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: impl Display) -> String {
        if self.color {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold_fg(&self, text: impl Display, color: Color) -> String {
        if self.color {
            style(text).with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: impl Display) -> String {
        if self.color {
            style(text).dim().to_string()
        } else {
            text.to_string()
        }
    }

    /// Foreground on a background, used for badges and the banner
    pub fn badge(&self, text: impl Display, color: Color, background: Color) -> String {
        if self.color {
            style(text).with(color).on(background).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Colour band for a Celsius temperature, whatever unit is displayed
pub fn temperature_color(celsius: f64) -> Color {
    if celsius >= 35.0 {
        RED
    } else if celsius >= 25.0 {
        ORANGE
    } else if celsius >= 15.0 {
        YELLOW
    } else if celsius >= 5.0 {
        GREEN
    } else if celsius >= -5.0 {
        CYAN
    } else {
        BLUE
    }
}

/// Colour for a US EPA index
pub fn aqi_color(index: u8) -> Color {
    match index {
        1 => GREEN,
        2 => YELLOW,
        3 => ORANGE,
        4 => RED,
        5 | 6 => PURPLE,
        _ => GRAY,
    }
}

/// Emoji for a condition description
pub fn weather_icon(condition: &str) -> &'static str {
    let lower = condition.to_lowercase();
    if lower.contains("sunny") || lower.contains("clear") {
        "☀️"
    } else if lower.contains("cloud") || lower.contains("overcast") {
        "☁️"
    } else if lower.contains("rain") || lower.contains("drizzle") {
        "🌧️"
    } else if lower.contains("snow") {
        "❄️"
    } else if lower.contains("storm") || lower.contains("thunder") {
        "⛈️"
    } else if lower.contains("fog") || lower.contains("mist") {
        "🌫️"
    } else {
        "🌤️"
    }
}
