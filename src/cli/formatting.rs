//! Terminal styling for CLI output.

/// ANSI escape codes
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";
    /// Red
    pub const RED: &'static str = "\x1b[31m";
    /// Green
    pub const GREEN: &'static str = "\x1b[32m";
    /// Yellow
    pub const YELLOW: &'static str = "\x1b[33m";
    /// Blue
    pub const BLUE: &'static str = "\x1b[34m";
    /// Cyan
    pub const CYAN: &'static str = "\x1b[36m";
}

fn styled(style: &str, text: &str) -> String {
    format!("{style}{text}{}", Colors::RESET)
}

/// Section header
pub fn format_header(text: &str) -> String {
    styled(&format!("{}{}", Colors::BOLD, Colors::CYAN), text)
}

/// Device or command name
pub fn format_command(text: &str) -> String {
    styled(&format!("{}{}", Colors::BOLD, Colors::GREEN), text)
}

/// Category name
pub fn format_category(text: &str) -> String {
    styled(&format!("{}{}", Colors::BOLD, Colors::BLUE), text)
}

/// Secondary text
pub fn format_description(text: &str) -> String {
    styled(Colors::DIM, text)
}

/// Error message
pub fn format_error(text: &str) -> String {
    styled(&format!("{}{}", Colors::BOLD, Colors::RED), text)
}

/// `on` in green, `off` dimmed
pub fn format_power(on: bool) -> String {
    if on {
        styled(Colors::GREEN, "on")
    } else {
        styled(Colors::DIM, "off")
    }
}

/// Unreachable devices are flagged in yellow
pub fn format_availability(available: bool) -> String {
    if available {
        String::new()
    } else {
        styled(Colors::YELLOW, " (unavailable)")
    }
}

/// Level in 0.0..=1.0 as a whole percentage
pub fn format_volume(level: f64) -> String {
    format!("{:.0}%", level * 100.0)
}
