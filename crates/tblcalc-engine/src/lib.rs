//! tblcalc-engine - plain-text table formulas (TBLFM).
//!
//! ```ignore
//! let mut table = vec![
//!     vec!["Item".to_string(), "Price".into(), "Qty".into(), "Total".into()],
//!     vec!["Apple".to_string(), "100".into(), "5".into(), "".into()],
//! ];
//! tblcalc_engine::apply(&mut table, &["$4=$2*$3"])?;
//! assert_eq!(table[1][3], "500");
//! ```

pub mod builtins;
pub mod engine;
pub mod error;

pub use engine::{Calculator, Options, apply, apply_with_options, split_formulas};
pub use error::{Result, TblfmError};
