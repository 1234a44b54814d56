//! Visual styling for CLI output.

use owo_colors::OwoColorize;

/// Format a success message.
pub fn format_success(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[OK] {}", message)
    } else {
        format!("{} {}", "[OK]".green(), message)
    }
}

/// Format a warning message.
pub fn format_warning(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[!!] {}", message)
    } else {
        format!("{} {}", "[!!]".yellow(), message)
    }
}

/// Format an error message.
pub fn format_error(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[XX] {}", message)
    } else {
        format!("{} {}", "[XX]".red(), message)
    }
}

/// Format a section title with underline.
pub fn format_title(title: &str, no_color: bool) -> String {
    let underline = "━".repeat(title.chars().count());
    if no_color {
        format!("{}\n{}", title, underline)
    } else {
        format!("{}\n{}", title.bold(), underline.dimmed())
    }
}

/// Format one `label: value` line, with a dash for missing values.
pub fn format_field(label: &str, value: Option<&str>, no_color: bool) -> String {
    let value = value.unwrap_or("-");
    if no_color {
        format!("  {:<24} {}", format!("{}:", label), value)
    } else {
        format!("  {:<24} {}", format!("{}:", label).dimmed(), value)
    }
}
