//! Errors from reading and writing delimited tables

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TblcalcError {
    #[error("cannot read table: {0}")]
    Read(#[from] std::io::Error),

    /// `line` is 1-based and counts blank lines.
    #[error("malformed row on line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, TblcalcError>;
