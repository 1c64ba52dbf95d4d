//! Expression evaluation.
//!
//! Reference substitution leaves a plain expression such as `100*5` or
//! `vsum([30,10,9.6])`. An [`Evaluator`] compiles and runs it. The default
//! evaluator is a Rhai engine with the table built-ins registered.

use rhai::{AST, Dynamic, Engine, Scope};

use super::Value;
use crate::error::{Result, TblfmError};

/// Compiles and runs a fully substituted expression.
pub trait Evaluator {
    type Program;

    fn compile(&self, source: &str) -> Result<Self::Program>;

    /// Run against an empty environment.
    fn run(&self, program: &Self::Program) -> Result<Value>;

    fn eval(&self, source: &str) -> Result<Value> {
        let program = self.compile(source)?;
        self.run(&program)
    }
}

/// Create a Rhai engine with built-ins registered.
pub fn create_engine() -> Engine {
    let mut engine = Engine::new();
    crate::builtins::register_builtins(&mut engine);
    engine
}

/// Rhai-backed [`Evaluator`].
pub struct RhaiEvaluator {
    engine: Engine,
}

impl RhaiEvaluator {
    pub fn new() -> Self {
        RhaiEvaluator {
            engine: create_engine(),
        }
    }
}

impl Default for RhaiEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for RhaiEvaluator {
    type Program = AST;

    fn compile(&self, source: &str) -> Result<AST> {
        self.engine
            .compile_expression(source)
            .map_err(|e| TblfmError::Compile(e.to_string()))
    }

    fn run(&self, program: &AST) -> Result<Value> {
        let mut scope = Scope::new();
        let result = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, program)?;
        Ok(dynamic_to_value(result))
    }
}

/// Convert an evaluation result to a cell value.
pub fn dynamic_to_value(value: Dynamic) -> Value {
    if value.is_unit() {
        return Value::Text(String::new());
    }
    if let Ok(n) = value.as_int() {
        return Value::Number(n as f64);
    }
    if let Ok(n) = value.as_float() {
        return Value::Number(n);
    }
    if value.is_string() {
        if let Ok(s) = value.clone().into_string() {
            return Value::Text(s);
        }
    }
    Value::Text(value.to_string())
}
