//! Built-in table functions (Rust) and their metadata.
//!
//! Conventions:
//! - Aggregates take either one array (what a range reference expands to) or
//!   a list of up to `MAX_AGGREGATE_ARGS` scalars: `vsum(@2..@4)`,
//!   `vsum($2, $3, 10)`.
//! - Numeric coercion is permissive. Text that parses as a number counts,
//!   anything else is skipped silently.
//! - If you add a new built-in, update `BUILTINS` and register its
//!   implementation in `register_builtins`.

use rand::Rng;
use rhai::{Dynamic, Engine};
use std::any::TypeId;

use crate::engine::Value;

pub struct Builtin {
    pub name: &'static str,
    pub description: &'static str,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "vsum",
        description: "Sum of numeric values",
    },
    Builtin {
        name: "vmax",
        description: "Maximum numeric value (0 if none)",
    },
    Builtin {
        name: "vmin",
        description: "Minimum numeric value (0 if none)",
    },
    Builtin {
        name: "vmean",
        description: "Arithmetic mean of numeric values",
    },
    Builtin {
        name: "vmedian",
        description: "Median of numeric values",
    },
    Builtin {
        name: "random",
        description: "Random integer between two bounds, inclusive",
    },
    Builtin {
        name: "randomf",
        description: "Random float in [0, 1)",
    },
    Builtin {
        name: "mean",
        description: "Alias of vmean",
    },
    Builtin {
        name: "ceil",
        description: "Round up to an integer value",
    },
    Builtin {
        name: "floor",
        description: "Round down to an integer value",
    },
    Builtin {
        name: "round",
        description: "Round half away from zero",
    },
    Builtin {
        name: "int",
        description: "Truncate to an integer (text is parsed)",
    },
    Builtin {
        name: "abs",
        description: "Absolute value",
    },
];

/// Numbers from an aggregate's arguments.
///
/// An array first argument is the whole input (the remaining arguments are
/// ignored); otherwise every argument is a candidate.
fn collect_numbers(args: &[Dynamic]) -> Vec<f64> {
    let items = match args.first() {
        Some(first) if first.is_array() => first.clone().into_array().unwrap_or_default(),
        _ => args.to_vec(),
    };
    items
        .iter()
        .filter_map(Value::from_dynamic)
        .filter_map(|v| v.to_number())
        .collect()
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v)
}

pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        sum(values) / values.len() as f64
    }
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Integer view of an argument: floats truncate, text must parse.
fn to_int(value: &Dynamic) -> i64 {
    if let Ok(n) = value.as_int() {
        return n;
    }
    if let Ok(n) = value.as_float() {
        return n as i64;
    }
    if let Some(Value::Text(s)) = Value::from_dynamic(value) {
        return s.trim().parse::<i64>().unwrap_or(0);
    }
    0
}

/// Most scalar arguments an aggregate accepts. Rhai resolves `Dynamic`
/// parameters for at most this many arguments.
pub const MAX_AGGREGATE_ARGS: usize = 16;

/// Register an aggregate for one array argument or up to
/// `MAX_AGGREGATE_ARGS` scalars.
fn register_aggregate(engine: &mut Engine, name: &str, aggregate: fn(&[f64]) -> f64) {
    for arity in 0..=MAX_AGGREGATE_ARGS {
        engine.register_raw_fn(
            name,
            vec![TypeId::of::<Dynamic>(); arity],
            move |_ctx, args| {
                let values: Vec<Dynamic> = args.iter().map(|arg| (**arg).clone()).collect();
                Ok(aggregate(&collect_numbers(&values)))
            },
        );
    }
}

pub fn register_builtins(engine: &mut Engine) {
    // Integer division yields a float, like the arithmetic of plain-text
    // table formulas. Built-in operators only yield to overloads when fast
    // operators are off.
    engine.set_fast_operators(false);
    engine.register_fn("/", |a: i64, b: i64| -> f64 { a as f64 / b as f64 });

    register_aggregate(engine, "vsum", sum);
    register_aggregate(engine, "vmax", max);
    register_aggregate(engine, "vmin", min);
    register_aggregate(engine, "vmean", mean);
    register_aggregate(engine, "vmedian", median);
    register_aggregate(engine, "mean", mean);

    // random(a, b): inclusive, bounds in either order
    engine.register_fn("random", |a: Dynamic, b: Dynamic| -> i64 {
        let (a, b) = (to_int(&a), to_int(&b));
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        rand::thread_rng().gen_range(lo..=hi)
    });
    engine.register_fn("randomf", || -> f64 { rand::thread_rng().r#gen() });

    engine.register_fn("ceil", |x: f64| -> f64 { x.ceil() });
    engine.register_fn("ceil", |x: i64| -> i64 { x });
    engine.register_fn("floor", |x: i64| -> i64 { x });
    engine.register_fn("round", |x: i64| -> i64 { x });
    engine.register_fn("int", |x: Dynamic| -> i64 { to_int(&x) });
}

/// Names of all built-ins, for help output.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|b| b.name)
}
