use super::Value;

/// Format a value for writing back into a cell.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Number(n) => format_number(*n),
        Value::Text(s) => s.clone(),
    }
}

/// Format a number for a cell.
///
/// Whole numbers print without a decimal point, everything else with the
/// fewest digits that round-trip. Exponent notation is never used.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 9.2e18 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_whole() {
        assert_eq!(format_number(500.0), "500");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_format_number_fraction() {
        assert_eq!(format_number(9.6), "9.6");
        assert_eq!(format_number(49.6), "49.6");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1e-7), "0.0000001");
    }

    #[test]
    fn test_format_number_large_and_special() {
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "+Inf");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_format_value_text_passes_through() {
        assert_eq!(format_value(&Value::Text("  x ".into())), "  x ");
    }
}
