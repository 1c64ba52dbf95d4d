//! CSV/TSV import/export functionality

use crate::error::{Result, TblcalcError};
use std::path::Path;

/// Delimited text formats a table can be read from and written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Csv,
    Tsv,
}

impl Format {
    /// Pick a format from a file extension: `.tsv`/`.tab` are TSV, all else CSV.
    pub fn from_path(path: &Path) -> Format {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("tsv") | Some("tab") => Format::Tsv,
            _ => Format::Csv,
        }
    }
}

/// Parse delimited text into rows of cells. Blank lines are skipped.
pub fn parse_table(content: &str, format: Format) -> Result<Vec<Vec<String>>> {
    let mut table = Vec::new();
    for (line_idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = match format {
            Format::Tsv => line.split('\t').map(str::to_string).collect(),
            Format::Csv => parse_csv_line(line).ok_or_else(|| TblcalcError::MalformedRow {
                line: line_idx + 1,
                reason: "unterminated quoted field".to_string(),
            })?,
        };
        table.push(row);
    }
    Ok(table)
}

/// Parse a single CSV line, handling quoted fields.
/// Returns None if a quoted field is left open.
pub(crate) fn parse_csv_line(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    field_was_quoted = true;
                }
                ',' => {
                    if field_was_quoted {
                        fields.push(std::mem::take(&mut current));
                    } else {
                        fields.push(current.trim().to_string());
                        current.clear();
                    }
                    field_was_quoted = false;
                }
                _ => current.push(c),
            }
        }
    }
    if in_quotes {
        return None;
    }
    if field_was_quoted {
        fields.push(current);
    } else {
        fields.push(current.trim().to_string());
    }
    Some(fields)
}

/// Render rows as delimited text, one line per row.
pub fn write_table(table: &[Vec<String>], format: Format) -> String {
    let mut out = String::new();
    for row in table {
        let line = match format {
            Format::Csv => row
                .iter()
                .map(|field| escape_csv_field(field))
                .collect::<Vec<_>>()
                .join(","),
            Format::Tsv => row
                .iter()
                .map(|field| field.replace(['\t', '\n', '\r'], " "))
                .collect::<Vec<_>>()
                .join("\t"),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Escape a field for CSV output
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
