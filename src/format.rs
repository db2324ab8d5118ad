//! Formatting utilities for the pim CLI client.
//!
//! This module provides functionality for formatting output as a plain text
//! table (the default), JSON or CSV. Output is always rendered to a string
//! first, so a command that fails prints nothing.

use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const TABLE: &str = "table";
pub const JSON: &str = "json";
pub const CSV: &str = "csv";

/// Widest a table cell may get before it is truncated.
pub const MAX_CELL_WIDTH: usize = 60;

/// Error types that can occur during formatting operations
#[derive(Debug, thiserror::Error)]
pub enum FormattingError {
    /// Error when an unsupported output format is requested
    #[error("invalid output format {0}")]
    UnsupportedOutputFormat(String),
    /// Error specific to CSV operations
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    /// Error when converting bytes to UTF-8 string
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    #[error("JSON serialization error: {0}")]
    JsonSerializationError(#[from] serde_json::Error),
    #[error("CSV writer into inner error: {0}")]
    CsvIntoInnerError(#[from] csv::IntoInnerError<csv::Writer<Vec<u8>>>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFormatOptions {
    pub with_headers: bool,
    pub pretty: bool,
}

/// Enum representing the supported output formats
#[derive(Debug, Clone, PartialEq, Eq, EnumIter)]
pub enum OutputFormat {
    /// Aligned plain text columns
    Table(OutputFormatOptions),
    /// JSON (JavaScript Object Notation) format
    Json(OutputFormatOptions),
    /// CSV (Comma-Separated Values) format
    Csv(OutputFormatOptions),
}

impl OutputFormat {
    /// Returns a vector of all supported format names as strings
    pub fn names() -> Vec<&'static str> {
        OutputFormat::iter().map(|f| f.name()).collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Table(_) => TABLE,
            OutputFormat::Json(_) => JSON,
            OutputFormat::Csv(_) => CSV,
        }
    }

    pub fn from_string_with_options(
        format_str: &str,
        options: OutputFormatOptions,
    ) -> Result<OutputFormat, FormattingError> {
        match format_str.to_lowercase().as_str() {
            TABLE => Ok(OutputFormat::Table(options)),
            JSON => Ok(OutputFormat::Json(options)),
            CSV => Ok(OutputFormat::Csv(options)),
            other => Err(FormattingError::UnsupportedOutputFormat(other.to_string())),
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Table(OutputFormatOptions::default())
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = FormattingError;

    fn from_str(format_str: &str) -> Result<OutputFormat, FormattingError> {
        Self::from_string_with_options(format_str, OutputFormatOptions::default())
    }
}

/// Anything that can be printed by a command.
pub trait Formattable {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError>;
}

pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, FormattingError> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

pub fn to_csv(
    headers: &[&str],
    rows: &[Vec<String>],
    with_headers: bool,
) -> Result<String, FormattingError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    if with_headers {
        wtr.write_record(headers)?;
    }
    for row in rows {
        wtr.write_record(row)?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

/// Render rows as left aligned columns under an underlined header.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| truncate(c, MAX_CELL_WIDTH)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.width());
            }
        }
    }

    let underline: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(render_line(headers.iter().copied(), &widths));
    lines.push(render_line(underline.iter().map(String::as_str), &widths));
    for row in &cells {
        lines.push(render_line(row.iter().map(String::as_str), &widths));
    }

    lines.join("\n")
}

fn render_line<'a, I>(cells: I, widths: &[usize]) -> String
where
    I: Iterator<Item = &'a str>,
{
    let mut line = String::new();
    for (i, (cell, width)) in cells.zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    line.trim_end().to_string()
}

fn truncate(value: &str, max_width: usize) -> String {
    if value.width() <= max_width {
        return value.to_string();
    }

    let mut result = String::new();
    let mut width = 0;
    for c in value.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        width += w;
        result.push(c);
    }
    result.push('…');
    result
}

/// Flatten a JSON value into a single table or CSV cell.
pub fn cell_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(cell_value).collect::<Vec<_>>().join(","),
        Value::Object(map) if map.values().all(|v| !v.is_object() && !v.is_array()) => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, cell_value(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}
