//! Storage module for CSV/TSV import/export and Markdown rendering

mod csv;
mod md;

pub use csv::{Format, parse_table, write_table};
pub use md::write_markdown;

use crate::error::Result;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read a whole table source: a file, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
