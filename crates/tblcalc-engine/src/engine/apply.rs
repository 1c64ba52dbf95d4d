//! Formula parsing and execution.
//!
//! A formula is `TARGET=EXPR` or `TARGET..TARGET=EXPR`. Formulas run strictly
//! in order. Each one visits its target cells row-major and writes every
//! result back immediately, so later cells (and later formulas) see it.

use log::{debug, trace, warn};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::address::ADDRESS_PATTERN;
use super::eval::{Evaluator, RhaiEvaluator};
use super::format::{format_number, format_value};
use super::preprocess::{RefContext, resolve_references};
use super::{Address, max_row_len};
use crate::error::{Result, TblfmError};

/// Options for applying formulas to a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// The first row is a header and never a target. Defaults to true.
    pub has_header: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { has_header: true }
    }
}

impl Options {
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Index of the first data row.
    pub fn data_start_row(&self) -> usize {
        if self.has_header { 1 } else { 0 }
    }
}

fn formula_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^({ADDRESS_PATTERN})(?:\.\.({ADDRESS_PATTERN}))?=(.+)$"
        ))
        .expect("formula regex must compile")
    })
}

/// A parsed formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formula {
    pub start: Address,
    /// Far corner of a range target.
    pub end: Option<Address>,
    pub expression: String,
}

/// Inclusive bounds on one axis; `None` leaves that side open.
type Bounds = (Option<isize>, Option<isize>);

fn within(bounds: Bounds, idx: usize) -> bool {
    let idx = idx as isize;
    bounds.0.is_none_or(|lo| idx >= lo) && bounds.1.is_none_or(|hi| idx <= hi)
}

impl Formula {
    pub fn parse(text: &str) -> Result<Formula> {
        let invalid = || TblfmError::InvalidFormula(text.to_string());
        let caps = formula_re().captures(text).ok_or_else(invalid)?;
        let start = Address::from_str(&caps[1]).ok_or_else(invalid)?;
        let end = match caps.get(2).map(|m| m.as_str()) {
            Some(token) if !token.is_empty() => Some(Address::from_str(token).ok_or_else(invalid)?),
            _ => None,
        };
        Ok(Formula {
            start,
            end,
            expression: caps[3].to_string(),
        })
    }

    /// Row and column bounds of the target on `table`.
    ///
    /// Targets have no current cell, so relative specs leave the axis open.
    fn target_bounds(&self, table: &[Vec<String>]) -> (Bounds, Bounds) {
        let row_len = table.len();
        let col_len = max_row_len(table);
        let resolve_row = |addr: &Address| addr.row.and_then(|s| s.resolve(None, row_len));
        let resolve_col = |addr: &Address| addr.col.and_then(|s| s.resolve(None, col_len));

        let end = self.end.as_ref().unwrap_or(&self.start);
        (
            (resolve_row(&self.start), resolve_row(end)),
            (resolve_col(&self.start), resolve_col(end)),
        )
    }
}

impl std::str::FromStr for Formula {
    type Err = TblfmError;

    fn from_str(s: &str) -> Result<Self> {
        Formula::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        if let Some(end) = &self.end {
            write!(f, "..{}", end)?;
        }
        write!(f, "={}", self.expression)
    }
}

/// Split a TBLFM script into formulas. Formulas are separated by newlines
/// or `::`; surrounding whitespace and empty entries are dropped.
pub fn split_formulas(script: &str) -> Vec<String> {
    script
        .lines()
        .flat_map(|line| line.split("::"))
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Applies formulas to tables with a given evaluator.
pub struct Calculator<E: Evaluator = RhaiEvaluator> {
    evaluator: E,
    options: Options,
}

impl Calculator<RhaiEvaluator> {
    pub fn new() -> Self {
        Calculator::with_evaluator(RhaiEvaluator::new())
    }
}

impl Default for Calculator<RhaiEvaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Evaluator> Calculator<E> {
    pub fn with_evaluator(evaluator: E) -> Self {
        Calculator {
            evaluator,
            options: Options::default(),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Apply formulas in order, mutating `table` in place.
    ///
    /// Stops at the first malformed formula. Changes made by earlier
    /// formulas stay in the table.
    pub fn apply<S: AsRef<str>>(&self, table: &mut [Vec<String>], formulas: &[S]) -> Result<()> {
        for formula in formulas {
            let text = formula.as_ref().trim();
            if text.is_empty() {
                continue;
            }
            let formula = Formula::parse(text).inspect_err(|e| warn!("{}", e))?;
            self.apply_formula(table, &formula);
        }
        Ok(())
    }

    /// Apply a single parsed formula to every cell it targets.
    pub fn apply_formula(&self, table: &mut [Vec<String>], formula: &Formula) {
        debug!("applying formula {}", formula);
        let data_start_row = self.options.data_start_row();
        let (rows, cols) = formula.target_bounds(table);

        for row in data_start_row..table.len() {
            if !within(rows, row) {
                continue;
            }
            for col in 0..table[row].len() {
                if !within(cols, col) {
                    continue;
                }
                let value = {
                    let ctx = RefContext::new(table, row, col, data_start_row);
                    self.compute_cell(&formula.expression, &ctx)
                };
                trace!("@{}${} = {}", row + 1, col + 1, value);
                table[row][col] = value;
            }
        }
    }

    /// Substitute references, then evaluate. Purely numeric results skip
    /// the evaluator; evaluator failures yield the substituted text.
    fn compute_cell(&self, expression: &str, ctx: &RefContext) -> String {
        let source = resolve_references(expression, ctx);
        if source.is_empty() {
            return source;
        }
        if let Ok(n) = source.parse::<f64>() {
            return format_number(n);
        }
        match self.evaluator.eval(&source) {
            Ok(value) => format_value(&value),
            Err(e) => {
                debug!("using literal text for `{}`: {}", source, e);
                source
            }
        }
    }
}

impl<E: Evaluator> Evaluator for &E {
    type Program = E::Program;

    fn compile(&self, source: &str) -> Result<Self::Program> {
        E::compile(*self, source)
    }

    fn run(&self, program: &Self::Program) -> Result<super::Value> {
        E::run(*self, program)
    }
}

fn shared_evaluator() -> &'static RhaiEvaluator {
    static EVALUATOR: OnceLock<RhaiEvaluator> = OnceLock::new();
    EVALUATOR.get_or_init(RhaiEvaluator::new)
}

/// Apply formulas to a table with a header row.
pub fn apply<S: AsRef<str>>(table: &mut [Vec<String>], formulas: &[S]) -> Result<()> {
    apply_with_options(table, formulas, Options::default())
}

/// Apply formulas with explicit options, using the shared Rhai evaluator.
pub fn apply_with_options<S: AsRef<str>>(
    table: &mut [Vec<String>],
    formulas: &[S],
    options: Options,
) -> Result<()> {
    Calculator::with_evaluator(shared_evaluator())
        .with_options(options)
        .apply(table, formulas)
}
