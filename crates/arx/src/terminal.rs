//! Styled output helpers.

use console::style;

/// Print a success message to stderr.
pub fn success(message: &str) {
    eprintln!("{} {message}", style("✓").green().bold());
}

/// Print a failure message to stderr.
pub fn failure(message: &str) {
    eprintln!("{} {message}", style("✗").red().bold());
}

/// Print a dimmed, indented line to stderr.
pub fn dim(message: &str) {
    eprintln!("  {}", style(message).dim());
}
