//! Reference substitution.
//!
//! Before an expression reaches the evaluator, every reference in it is
//! replaced by a literal drawn from the table. Three kinds of reference are
//! recognised, in order of precedence:
//!
//! - **Ranges**: `@<..@>>` → `[v1,v2,...]` (numbers bare, text quoted)
//! - **Cells**: `@2$3`, `$-1` → raw text of the referenced cell
//! - **Rows**: `@2`, `@-1` → raw text of that row in the current column
//!
//! The expression is scanned once, left to right, so substituted text is
//! never scanned again and everything else passes through untouched.
//! References that land outside the table become `0`.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::address::{ADDRESS_PATTERN, AXIS_PATTERN};
use super::range::{expand_range, range_literal};
use super::{Address, AxisSpec};

/// The cell being computed, plus the table it lives in.
#[derive(Clone, Copy, Debug)]
pub struct RefContext<'a> {
    pub table: &'a [Vec<String>],
    /// 0-based row of the cell being computed.
    pub row: usize,
    /// 0-based column of the cell being computed.
    pub col: usize,
    pub data_start_row: usize,
}

impl<'a> RefContext<'a> {
    pub fn new(table: &'a [Vec<String>], row: usize, col: usize, data_start_row: usize) -> Self {
        RefContext {
            table,
            row,
            col,
            data_start_row,
        }
    }

    fn cell(&self, row: isize, col: isize) -> Option<&'a str> {
        if row < 0 || col < 0 {
            return None;
        }
        self.table
            .get(row as usize)?
            .get(col as usize)
            .map(String::as_str)
    }

    /// Row named by an optional `@` spec; no spec means the current row.
    fn source_row(&self, spec: Option<&str>) -> Option<isize> {
        match spec {
            None => Some(self.row as isize),
            Some(s) => AxisSpec::parse(s)?.resolve(Some(self.row), self.table.len()),
        }
    }
}

/// Any reference, tried in precedence order at each position:
///
/// - `start`/`end`: a range, `ADDR..ADDR`
/// - `cell_row`/`cell_col`: a cell, optional `@ROW` and mandatory `$COL`
/// - `row`: a bare row, `@ROW`
fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?P<start>{ADDRESS_PATTERN})\.\.(?P<end>{ADDRESS_PATTERN})|(?:@(?P<cell_row>{AXIS_PATTERN}))?\$(?P<cell_col>{AXIS_PATTERN})|@(?P<row>{AXIS_PATTERN})"
        ))
        .expect("reference regex must compile")
    })
}

/// Substitute every range, cell and row reference in `expression`.
pub fn resolve_references(expression: &str, ctx: &RefContext) -> String {
    reference_re()
        .replace_all(expression, |caps: &Captures| {
            if let (Some(start), Some(end)) = (caps.name("start"), caps.name("end")) {
                return match (Address::from_str(start.as_str()), Address::from_str(end.as_str())) {
                    (Some(start), Some(end)) => range_literal(&expand_range(&start, &end, ctx)),
                    _ => caps[0].to_string(),
                };
            }
            let value = match caps.name("cell_col") {
                Some(col) => resolve_cell(caps.name("cell_row").map(|m| m.as_str()), col.as_str(), ctx),
                None => caps
                    .name("row")
                    .and_then(|row| ctx.source_row(Some(row.as_str())))
                    .and_then(|row| ctx.cell(row, ctx.col as isize)),
            };
            value.unwrap_or("0").to_string()
        })
        .into_owned()
}

fn resolve_cell<'a>(row_spec: Option<&str>, col_spec: &str, ctx: &RefContext<'a>) -> Option<&'a str> {
    let row = ctx.source_row(row_spec)?;
    if row < 0 {
        return None;
    }
    // Edge columns count from the end of the referenced row.
    let row_len = ctx.table.get(row as usize)?.len();
    let col = AxisSpec::parse(col_spec)?.resolve(Some(ctx.col), row_len)?;
    ctx.cell(row, col)
}
