//! Color utilities for CLI output

use console::{Style, StyledObject};

/// Style the final status line of a run
///
/// - success -> green bold
/// - failure -> red bold
pub fn outcome_style(success: bool, message: &str) -> StyledObject<String> {
    let style = if success {
        Style::new().green().bold()
    } else {
        Style::new().red().bold()
    };
    style.apply_to(message.to_string())
}

/// Style the program name in banners
pub fn name_style(name: &str) -> StyledObject<&str> {
    Style::new().cyan().bold().apply_to(name)
}
