//! Output formatting utilities for CLI commands
//!
//! Provides consistent formatting for:
//! - Tables with column alignment
//! - Timestamps of stored lines
//! - Short forms of long text for table cells

use chrono::{DateTime, Local, Utc};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};

/// Build a table with the standard preset and a cyan header row
pub fn build_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        table.add_row(row);
    }

    table
}

/// Print a table with headers and rows
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    println!("{}", build_table(headers, rows));
}

/// Format a commit timestamp in local time
///
/// Lines not yet committed by the store show as "pending".
pub fn format_created(created_at: Option<DateTime<Utc>>) -> String {
    match created_at {
        Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "pending".to_string(),
    }
}

/// Shorten text for a table cell, keeping the start
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let head: String = text.chars().take(keep).collect();
    format!("{}...", head)
}

/// "1 line" / "3 lines"
pub fn plural(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}
