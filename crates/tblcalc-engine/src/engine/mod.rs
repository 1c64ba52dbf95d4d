//! Table formula engine API.
//!
//! This module provides the TBLFM computation engine:
//!
//! - [`Address`], [`AxisSpec`] - `@row$col` position parsing
//! - [`Value`] - Number/text cell values with permissive coercion
//! - [`expand_range`] - `ADDR..ADDR` range expansion
//! - [`resolve_references`] - Substitute references with literals
//! - [`Evaluator`], [`RhaiEvaluator`] - Compile and run substituted expressions
//! - [`Calculator`], [`apply`] - Apply formulas to a table in place
//! - [`format_number`] - Format values for cells

mod address;
mod apply;
mod eval;
mod format;
mod preprocess;
mod range;
mod value;

pub use address::{Address, AxisSpec};
pub use apply::{Calculator, Formula, Options, apply, apply_with_options, split_formulas};
pub use eval::{Evaluator, RhaiEvaluator, create_engine, dynamic_to_value};
pub use format::{format_number, format_value};
pub use preprocess::{RefContext, resolve_references};
pub use range::{expand_range, range_literal};
pub use value::Value;

pub use rhai::{AST, Dynamic};

/// Length of the longest row.
pub(crate) fn max_row_len(table: &[Vec<String>]) -> usize {
    table.iter().map(Vec::len).max().unwrap_or(0)
}
