//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned `name: value` line
    pub fn field(name: &str, value: &str) {
        println!("  {:<15} {}", format!("{name}:").dimmed(), value);
    }
}

/// Render an optional plain value, or `(not set)`
pub fn format_optional(value: Option<&str>) -> String {
    value.map_or_else(|| "(not set)".to_string(), String::from)
}

/// Render a secret by its length only
pub fn format_secret(len: Option<usize>) -> String {
    match len {
        Some(len) => format!("******** ({})", format_count(len, "char", "chars")),
        None => "(not set)".to_string(),
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some("upload")), "upload");
        assert_eq!(format_optional(None), "(not set)");
    }

    #[test]
    fn test_format_secret_shows_length_only() {
        assert_eq!(format_secret(Some(6)), "******** (6 chars)");
        assert_eq!(format_secret(Some(1)), "******** (1 char)");
        assert_eq!(format_secret(None), "(not set)");
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "file", "files"), "1 file");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(5, "file", "files"), "5 files");
    }
}
