//! Error types for the table formula engine.

use thiserror::Error;

use rhai::EvalAltResult;

/// Errors raised while applying table formulas.
#[derive(Error, Debug)]
pub enum TblfmError {
    #[error("invalid formula format: {0}")]
    InvalidFormula(String),

    #[error("Rhai compile error: {0}")]
    Compile(String),

    #[error("Rhai error: {0}")]
    Eval(
        #[from]
        #[source]
        Box<EvalAltResult>,
    ),
}

pub type Result<T> = std::result::Result<T, TblfmError>;
