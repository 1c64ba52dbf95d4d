//! Position addresses in `@row$col` notation.
//!
//! An address names a row and/or a column with one of four forms per axis:
//!
//! - `@3`, `$2` - absolute, 1-based
//! - `@-1`, `$-2` - relative to the cell being computed
//! - `@<`, `@<<`, `@<<<` - first, second, third index of the axis
//! - `@>`, `@>>`, `@>>>` - last, second-to-last, third-to-last index
//!
//! Either half may be missing. A missing half means "every index" when the
//! address is a formula target and "the current index" inside an expression.
//!
//! # Examples
//!
//! ```ignore
//! let addr = Address::from_str("@2$>").unwrap();
//! assert_eq!(addr.row, Some(AxisSpec::Absolute(2)));
//! assert_eq!(addr.col, Some(AxisSpec::FromEnd(1)));
//! assert_eq!(addr.to_string(), "@2$>");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// One axis of an address, before it is resolved against a table.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum AxisSpec {
    /// 1-based index. `0` never resolves to a cell.
    Absolute(i64),
    /// Signed offset from the current index (always negative when parsed).
    Relative(i64),
    /// `<` = 0, `<<` = 1, `<<<` = 2.
    FromStart(usize),
    /// `>` = 1, `>>` = 2, `>>>` = 3 cells back from the axis length.
    FromEnd(usize),
}

impl AxisSpec {
    /// Parse the part after a sigil: a signed integer or 1-3 `<`/`>`.
    pub fn parse(spec: &str) -> Option<AxisSpec> {
        match spec {
            "<" => Some(AxisSpec::FromStart(0)),
            "<<" => Some(AxisSpec::FromStart(1)),
            "<<<" => Some(AxisSpec::FromStart(2)),
            ">" => Some(AxisSpec::FromEnd(1)),
            ">>" => Some(AxisSpec::FromEnd(2)),
            ">>>" => Some(AxisSpec::FromEnd(3)),
            _ => {
                let digits = spec.strip_prefix(['+', '-']).unwrap_or(spec);
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                // Out-of-range numbers degrade to 0, which addresses nothing.
                let n = spec.parse::<i64>().unwrap_or(0);
                if n < 0 {
                    Some(AxisSpec::Relative(n))
                } else {
                    Some(AxisSpec::Absolute(n))
                }
            }
        }
    }

    /// Resolve to a 0-based index on an axis of length `len`.
    ///
    /// `current` is the 0-based index of the cell being computed. Relative
    /// specs have no meaning without it and resolve to `None` (unconstrained).
    /// The result may be negative or past the end; callers bounds-check.
    pub fn resolve(&self, current: Option<usize>, len: usize) -> Option<isize> {
        match *self {
            AxisSpec::Absolute(n) => Some(saturating_isize(n) - 1),
            AxisSpec::Relative(n) => current.map(|cur| cur as isize + saturating_isize(n)),
            AxisSpec::FromStart(k) => Some(k as isize),
            AxisSpec::FromEnd(k) => Some(len as isize - k as isize),
        }
    }
}

fn saturating_isize(n: i64) -> isize {
    isize::try_from(n).unwrap_or(if n < 0 { isize::MIN / 2 } else { isize::MAX / 2 })
}

impl fmt::Display for AxisSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AxisSpec::Absolute(n) | AxisSpec::Relative(n) => write!(f, "{}", n),
            AxisSpec::FromStart(k) => write!(f, "{}", "<".repeat(k + 1)),
            AxisSpec::FromEnd(k) => write!(f, "{}", ">".repeat(k)),
        }
    }
}

/// A `(row, col)` position specifier; either half may be absent.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub struct Address {
    pub row: Option<AxisSpec>,
    pub col: Option<AxisSpec>,
}

/// One axis after its sigil: signed integer or 1-3 edge markers.
pub(crate) const AXIS_PATTERN: &str = r"[-+]?[0-9]+|<{1,3}|>{1,3}";

/// An address token without anchors or capture groups.
pub(crate) const ADDRESS_PATTERN: &str =
    r"(?:@(?:[-+]?[0-9]+|<{1,3}|>{1,3}))?(?:\$(?:[-+]?[0-9]+|<{1,3}|>{1,3}))?";

/// Matches a whole address token such as `@2$3`, `$4`, `@>` or the empty string.
fn address_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^(?:@({AXIS_PATTERN}))?(?:\$({AXIS_PATTERN}))?$"))
            .expect("address regex must compile")
    })
}

impl Address {
    pub fn new(row: Option<AxisSpec>, col: Option<AxisSpec>) -> Address {
        Address { row, col }
    }

    /// Parse an address token. Returns None if it does not fit the grammar.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(token: &str) -> Option<Address> {
        let caps = address_re().captures(token)?;
        let row = match caps.get(1) {
            Some(m) => Some(AxisSpec::parse(m.as_str())?),
            None => None,
        };
        let col = match caps.get(2) {
            Some(m) => Some(AxisSpec::parse(m.as_str())?),
            None => None,
        };
        Some(Address { row, col })
    }

    /// True for the empty address (no row, no column).
    pub fn is_empty(&self) -> bool {
        self.row.is_none() && self.col.is_none()
    }
}

impl std::str::FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_str(s).ok_or_else(|| format!("Invalid address: {}", s))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(row) = &self.row {
            write!(f, "@{}", row)?;
        }
        if let Some(col) = &self.col {
            write!(f, "${}", col)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Address, AxisSpec};

    #[test]
    fn test_parse_edges() {
        assert_eq!(AxisSpec::parse("<"), Some(AxisSpec::FromStart(0)));
        assert_eq!(AxisSpec::parse("<<<"), Some(AxisSpec::FromStart(2)));
        assert_eq!(AxisSpec::parse(">"), Some(AxisSpec::FromEnd(1)));
        assert_eq!(AxisSpec::parse(">>>"), Some(AxisSpec::FromEnd(3)));
        assert_eq!(AxisSpec::parse("<<<<"), None);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(AxisSpec::parse("3"), Some(AxisSpec::Absolute(3)));
        assert_eq!(AxisSpec::parse("+3"), Some(AxisSpec::Absolute(3)));
        assert_eq!(AxisSpec::parse("-1"), Some(AxisSpec::Relative(-1)));
        assert_eq!(AxisSpec::parse("0"), Some(AxisSpec::Absolute(0)));
        assert_eq!(AxisSpec::parse("-"), None);
        assert_eq!(AxisSpec::parse("x"), None);
    }

    #[test]
    fn test_huge_number_degrades_to_zero() {
        let huge = "9".repeat(40);
        assert_eq!(AxisSpec::parse(&huge), Some(AxisSpec::Absolute(0)));
    }

    #[test]
    fn test_resolve() {
        assert_eq!(AxisSpec::Absolute(2).resolve(None, 10), Some(1));
        assert_eq!(AxisSpec::Absolute(0).resolve(None, 10), Some(-1));
        assert_eq!(AxisSpec::Relative(-1).resolve(Some(3), 10), Some(2));
        assert_eq!(AxisSpec::Relative(-1).resolve(None, 10), None);
        assert_eq!(AxisSpec::FromStart(1).resolve(None, 10), Some(1));
        assert_eq!(AxisSpec::FromEnd(1).resolve(None, 10), Some(9));
        assert_eq!(AxisSpec::FromEnd(3).resolve(None, 2), Some(-1));
    }

    #[test]
    fn test_address_from_str() {
        let addr = Address::from_str("@2$>").unwrap();
        assert_eq!(addr.row, Some(AxisSpec::Absolute(2)));
        assert_eq!(addr.col, Some(AxisSpec::FromEnd(1)));

        let addr = Address::from_str("$4").unwrap();
        assert_eq!(addr.row, None);
        assert_eq!(addr.col, Some(AxisSpec::Absolute(4)));

        assert!(Address::from_str("").unwrap().is_empty());
        assert!(Address::from_str("$4@2").is_none());
        assert!(Address::from_str("A1").is_none());
    }

    #[test]
    fn test_address_display_roundtrip() {
        for token in ["@2$3", "$-1", "@<<", "@>>>$<", "@+3"] {
            let addr = Address::from_str(token).unwrap();
            let expected = token.replace('+', "");
            assert_eq!(addr.to_string(), expected);
        }
    }
}
