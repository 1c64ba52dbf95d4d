use rhai::Dynamic;

/// A cell or expression value: a number or a piece of text.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Classify raw cell text: anything that parses as a float is a number.
    pub fn from_cell(text: &str) -> Value {
        match text.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(text.to_string()),
        }
    }

    /// Convert an expression argument. Integers and floats become numbers,
    /// strings stay text; anything else (bool, unit, maps) is not a value.
    pub fn from_dynamic(value: &Dynamic) -> Option<Value> {
        if let Ok(n) = value.as_float() {
            return Some(Value::Number(n));
        }
        if let Ok(n) = value.as_int() {
            return Some(Value::Number(n as f64));
        }
        if value.is_string() {
            return value.clone().into_string().ok().map(Value::Text);
        }
        None
    }

    /// Permissive numeric coercion: text counts only if it parses.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.parse::<f64>().ok(),
        }
    }

    /// Render as an element of an array literal.
    /// Empty text is dropped; other text is quoted.
    pub fn to_literal(&self) -> Option<String> {
        match self {
            Value::Number(n) if n.is_finite() => Some(n.to_string()),
            Value::Number(n) => Some(quote(&n.to_string())),
            Value::Text(s) if s.is_empty() => None,
            Value::Text(s) => Some(quote(s)),
        }
    }
}

/// Quote text as a string literal for the expression evaluator.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cell() {
        assert_eq!(Value::from_cell("2.5"), Value::Number(2.5));
        assert_eq!(Value::from_cell("-3"), Value::Number(-3.0));
        assert_eq!(Value::from_cell("Total"), Value::Text("Total".to_string()));
        assert_eq!(Value::from_cell(""), Value::Text(String::new()));
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Value::Number(4.0).to_number(), Some(4.0));
        assert_eq!(Value::Text("1.5".into()).to_number(), Some(1.5));
        assert_eq!(Value::Text("abc".into()).to_number(), None);
    }

    #[test]
    fn test_from_dynamic() {
        assert_eq!(
            Value::from_dynamic(&Dynamic::from(3_i64)),
            Some(Value::Number(3.0))
        );
        assert_eq!(
            Value::from_dynamic(&Dynamic::from(0.5_f64)),
            Some(Value::Number(0.5))
        );
        assert_eq!(
            Value::from_dynamic(&Dynamic::from("x".to_string())),
            Some(Value::Text("x".into()))
        );
        assert_eq!(Value::from_dynamic(&Dynamic::from(true)), None);
    }

    #[test]
    fn test_to_literal() {
        assert_eq!(Value::Number(30.0).to_literal().as_deref(), Some("30"));
        assert_eq!(Value::Number(9.6).to_literal().as_deref(), Some("9.6"));
        assert_eq!(Value::Text(String::new()).to_literal(), None);
        assert_eq!(
            Value::Text("say \"hi\"".into()).to_literal().as_deref(),
            Some(r#""say \"hi\"""#)
        );
    }
}
