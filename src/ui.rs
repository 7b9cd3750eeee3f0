//! Terminal output for the command-line front end.
//!
//! Everything here writes to stderr; stdout carries only the version string.

use console::style;

/// Format an error message with a red prefix.
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").for_stderr().red().bold(), message)
}

/// Format a hint with a yellow arrow.
pub fn format_hint(message: &str) -> String {
    format!("{} {}", style("→").for_stderr().yellow(), message)
}

/// Print an error message to stderr.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

/// Print a hint to stderr.
pub fn display_hint(message: &str) {
    eprintln!("{}", format_hint(message));
}
