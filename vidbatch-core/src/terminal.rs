//! Terminal output styling for vidbatch.
//!
//! Output goes through the `log` facade at info level so the same lines reach
//! the console and the run log. Styling uses `console` and is disabled when
//! `NO_COLOR` is set.

use console::style;
use log::info;

/// Width of the label column in status lines.
const LABEL_WIDTH: usize = 15;

/// Represents the visual hierarchy levels in the CLI output
#[derive(Debug, Clone, Copy)]
pub enum OutputLevel {
    /// Main sections (===== SECTION =====)
    Section,
    /// Processing steps (» Operation)
    Subsection,
    /// Items under a processing step
    Progress,
    /// Key-value status information
    Status,
}

impl OutputLevel {
    fn indent(self) -> &'static str {
        match self {
            OutputLevel::Section => "",
            OutputLevel::Subsection => "  ",
            OutputLevel::Progress => "    ",
            OutputLevel::Status => "      ",
        }
    }
}

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Print a section header for major workflow phases
pub fn print_section(title: &str) {
    info!("");
    let indent = OutputLevel::Section.indent();
    if should_use_color() {
        info!("{indent}===== {} =====", style(title.to_uppercase()).cyan());
    } else {
        info!("{indent}===== {} =====", title.to_uppercase());
    }
    info!("");
}

/// Print a subsection or processing step
pub fn print_processing(message: &str) {
    info!("");
    let indent = OutputLevel::Subsection.indent();
    if should_use_color() {
        info!("{indent}» {}", style(message).bold());
    } else {
        info!("{indent}» {message}");
    }
}

/// Print a sub-item under a processing step
pub fn print_sub_item(message: &str) {
    info!("{}{message}", OutputLevel::Progress.indent());
}

/// Formats a key-value line with the label padded to a fixed column.
fn format_status(label: &str, value: &str) -> String {
    let width = console::measure_text_width(label);
    let padding = LABEL_WIDTH.saturating_sub(width).max(1);
    format!(
        "{}{label}:{} {value}",
        OutputLevel::Status.indent(),
        " ".repeat(padding)
    )
}

/// Print a status line (key-value pair)
pub fn print_status(label: &str, value: &str, highlight: bool) {
    if should_use_color() && highlight {
        info!("{}", format_status(label, &style(value).bold().to_string()));
    } else {
        info!("{}", format_status(label, value));
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    if should_use_color() {
        info!("  ✓ {}", style(message).green());
    } else {
        info!("  ✓ {message}");
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    if should_use_color() {
        info!("  ⚠ {}", style(message).yellow());
    } else {
        info!("  ⚠ {message}");
    }
}

/// Print an error message
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    if should_use_color() {
        info!("✗ {}", style(title).red().bold());
    } else {
        info!("✗ {title}");
    }

    info!("");
    info!("  Message:  {message}");

    if let Some(suggestion_text) = suggestion {
        info!("");
        info!("  Suggestion: {suggestion_text}");
    }

    info!("");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_status_alignment() {
        assert_eq!(
            format_status("Total", "3"),
            format!("      Total:{} 3", " ".repeat(10))
        );
        // Over-long labels still get one space
        let long = "A very long status label";
        assert_eq!(format_status(long, "x"), format!("      {long}:  x"));
    }
}
