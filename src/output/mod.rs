//
//  tfgit
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Formatting
//!
//! Commands print either human readable tables or JSON for scripting.
//!
//! | Format | Flag | Use case |
//! |--------|------|----------|
//! | Table | (default) | interactive use |
//! | JSON | `--json` | scripting, piping to `jq` |
//!
//! Detail views implement [`TableOutput`]; list views implement
//! [`TableRow`] and are rendered as one table.
//!
//! Colors follow `console`'s detection, so `NO_COLOR` and non-TTY output
//! are respected.

mod json;
mod table;

pub use json::*;
pub use table::*;

use console::style;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Table
        }
    }
}

/// Writes command results in the selected format.
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Writes one value.
    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(value),
            OutputFormat::Table => {
                value.print_table(self.color);
                Ok(())
            }
        }
    }

    /// Writes a list; `empty` is printed instead of an empty table.
    pub fn write_list<T: Serialize + TableRow>(&self, values: &[T], empty: &str) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(&values),
            OutputFormat::Table => {
                if values.is_empty() {
                    self.write_info(empty);
                    return Ok(());
                }
                TableBuilder::new()
                    .color(self.color)
                    .headers(T::HEADERS.iter().copied())
                    .rows(values.iter().map(|v| v.row(self.color)))
                    .print();
                Ok(())
            }
        }
    }

    pub fn write_error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
    }

    pub fn write_warning(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }

    pub fn write_info(&self, msg: &str) {
        println!("{}", msg);
    }

    /// Success messages are suppressed in JSON mode.
    pub fn write_success(&self, msg: &str) {
        if self.is_json() {
            return;
        }
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("✓ {}", msg);
        }
    }
}

/// Detail view of a single value.
pub trait TableOutput {
    fn print_table(&self, color: bool);
}

/// One row of a list table.
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn row(&self, color: bool) -> Vec<String>;
}

pub fn print_header(text: &str) {
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.chars().count()));
}

/// Prints `key: value`, dimming the key when colored.
pub fn print_field(key: &str, value: &str, color: bool) {
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}

/// Like [`print_field`], skipping absent values.
pub fn print_optional_field(key: &str, value: Option<&str>, color: bool) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        print_field(key, value, color);
    }
}
