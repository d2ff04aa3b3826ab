//
//  tfgit
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Table rendering on `comfy-table`, plus cell formatters.

use chrono::{DateTime, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use console::style;

pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Builder over a [`Table`].
///
/// # Example
///
/// ```rust,ignore
/// TableBuilder::new()
///     .headers(["Name", "Default branch"])
///     .row(["widgets", "main"])
///     .print();
/// ```
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let color = self.color;
        let cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| {
                let cell = Cell::new(h.into());
                if color {
                    cell.fg(Color::Cyan)
                } else {
                    cell
                }
            })
            .collect();
        self.table.set_header(cells);
        self
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        self.table.add_row(row);
        self
    }

    pub fn rows<I, R, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for row in rows {
            let row: Vec<String> = row.into_iter().map(Into::into).collect();
            self.table.add_row(row);
        }
        self
    }

    pub fn print(self) {
        println!("{}", self.table);
    }

    pub fn build(self) -> Table {
        self.table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Colors a pull request status.
pub fn format_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_string();
    }
    match status.to_lowercase().as_str() {
        "active" => style(status).green().to_string(),
        "completed" => style(status).blue().to_string(),
        "abandoned" => style(status).red().to_string(),
        "notset" => style(status).dim().to_string(),
        _ => status.to_string(),
    }
}

/// Colors a reviewer vote label.
pub fn format_vote(label: &str, vote: i16, color: bool) -> String {
    if !color {
        return label.to_string();
    }
    match vote {
        v if v > 0 => style(label).green().to_string(),
        v if v < -5 => style(label).red().to_string(),
        v if v < 0 => style(label).yellow().to_string(),
        _ => style(label).dim().to_string(),
    }
}

pub fn format_bool(value: bool, color: bool) -> String {
    let text = if value { "Yes" } else { "No" };
    match (color, value) {
        (false, _) => text.to_string(),
        (true, true) => style(text).green().to_string(),
        (true, false) => style(text).dim().to_string(),
    }
}

/// `2026-01-12 14:03`, or `-` when absent.
pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Human readable byte count.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

/// Cuts `s` to `max_len` characters, marking the cut with `...`.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer subject line", 10), "a longe...");
        assert_eq!(truncate("ünïcödé text", 8), "ünïcö...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2026, 1, 12, 14, 3, 0).unwrap();
        assert_eq!(format_date(Some(&date)), "2026-01-12 14:03");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn test_plain_formatters() {
        assert_eq!(format_status("active", false), "active");
        assert_eq!(format_vote("Approved", 10, false), "Approved");
        assert_eq!(format_bool(true, false), "Yes");
    }

    #[test]
    fn test_builder_renders_rows() {
        let table = TableBuilder::new()
            .color(false)
            .headers(["Name", "Size"])
            .row(["widgets", "12 KB"])
            .build();
        let rendered = table.to_string();
        assert!(rendered.contains("widgets"));
        assert!(rendered.contains("Size"));
    }
}
