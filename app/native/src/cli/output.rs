//! CLI output formatting utilities.
//!
//! This module provides utilities for formatting CLI output including:
//! - One-line summaries of dispatcher reports
//! - JSON syntax highlighting

use colored::Colorize;

use crate::error::{CarouselError, Report, Warning};

/// Renders a dispatcher report as the line printed to stdout.
///
/// Returns `None` for reports that have nothing to say.
#[must_use]
pub fn report_line(report: &Report) -> Option<String> {
    match report {
        Report::Nothing => None,
        Report::Applied { path, category: Some(category) } => {
            Some(format!("{} {} ({category})", "Applied".green(), path.display()))
        }
        Report::Applied { path, category: None } => {
            Some(format!("{} {}", "Applied".green(), path.display()))
        }
        Report::Identity { name } => Some(name.clone()),
        Report::Locked => Some("Wallpaper changes locked".to_string()),
        Report::Unlocked => Some("Wallpaper changes unlocked".to_string()),
        Report::Status { locked: true } => Some("locked".yellow().to_string()),
        Report::Status { locked: false } => Some("unlocked".green().to_string()),
    }
}

/// Prints a warning to stderr.
pub fn print_warning(warning: &Warning) {
    eprintln!("{} {warning}", "warning:".yellow().bold());
}

/// Formats a hard error the way `main` reports it.
#[must_use]
pub fn error_line(err: &CarouselError) -> String {
    format!("carousel: {} @{{{}}} {err}", err.code(), err.origin())
}

/// Prints JSON with syntax highlighting.
///
/// Colors:
/// - Keys: Cyan
/// - Strings: Green
/// - Numbers: Yellow
/// - Booleans/Null: Magenta
/// - Brackets/Braces: White (default)
pub fn print_highlighted_json(value: &serde_json::Value) {
    let json_str = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    print_highlighted_json_str(&json_str);
}

/// Prints a JSON string with syntax highlighting.
fn print_highlighted_json_str(json: &str) {
    let mut in_string = false;
    let mut is_key = false;
    let mut escape_next = false;
    let mut current_token = String::new();
    let mut after_colon = false;

    for ch in json.chars() {
        if escape_next {
            current_token.push(ch);
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            current_token.push(ch);
            escape_next = true;
            continue;
        }

        match ch {
            '"' => {
                if in_string {
                    // End of string
                    current_token.push(ch);
                    if is_key {
                        print!("{}", current_token.cyan());
                    } else {
                        print!("{}", current_token.green());
                    }
                    current_token.clear();
                    in_string = false;
                    is_key = false;
                } else {
                    // Start of string
                    flush_token(&mut current_token, after_colon);
                    current_token.push(ch);
                    in_string = true;
                    // It's a key if we're not after a colon
                    is_key = !after_colon;
                    after_colon = false;
                }
            }
            ':' if !in_string => {
                flush_token(&mut current_token, false);
                print!("{}", ":".white());
                after_colon = true;
            }
            ',' if !in_string => {
                flush_token(&mut current_token, after_colon);
                print!("{}", ",".white());
                after_colon = false;
            }
            '{' | '}' | '[' | ']' if !in_string => {
                flush_token(&mut current_token, after_colon);
                print!("{}", ch.to_string().white().bold());
                after_colon = false;
            }
            _ => {
                current_token.push(ch);
            }
        }
    }

    // Flush any remaining token
    flush_token(&mut current_token, after_colon);
    println!();
}

/// Flushes the current token with appropriate coloring.
fn flush_token(token: &mut String, is_value: bool) {
    if token.is_empty() {
        return;
    }

    let trimmed = token.trim();
    if trimmed.is_empty() {
        print!("{token}");
    } else if is_value {
        // Find the actual value position in the token
        let start = token.find(|c: char| !c.is_whitespace()).unwrap_or(0);
        let end = token.rfind(|c: char| !c.is_whitespace()).map_or(token.len(), |i| i + 1);

        let prefix = &token[..start];
        let value = &token[start..end];
        let suffix = &token[end..];

        // Check if it's a number, boolean, or null
        if value == "true" || value == "false" || value == "null" {
            print!("{}{}{}", prefix, value.magenta(), suffix);
        } else if value.parse::<f64>().is_ok() {
            print!("{}{}{}", prefix, value.yellow(), suffix);
        } else {
            print!("{token}");
        }
    } else {
        print!("{token}");
    }

    token.clear();
}

/// Truncates a string to a maximum number of characters, adding ellipsis if needed.
///
/// This function correctly handles multi-byte UTF-8 characters by counting
/// characters rather than bytes.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();

    if char_count <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        "…".to_string()
    } else {
        // Find the byte index of the (max_chars - 1)th character
        let truncate_at = s.char_indices().nth(max_chars - 1).map_or(s.len(), |(idx, _)| idx);
        format!("{}…", &s[..truncate_at])
    }
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}
