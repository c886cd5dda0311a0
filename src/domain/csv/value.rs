// ============================================================
// CELL VALUE
// ============================================================
// Tagged value produced for every CSV cell

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed content of a single CSV cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Cell whose trimmed text parsed fully as a finite decimal number
    Number(f64),

    /// Any other non-empty cell, trimmed
    Text(String),

    /// Empty (or whitespace-only) cell, or a column missing from a short row
    Absent,
}

impl Value {
    /// Type a raw cell the way the parser does
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Absent;
        }

        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Value::Number(number),
            _ => Value::Text(trimmed.to_string()),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Numeric view; numeric-looking text is accepted too
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Value::Absent => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Absent
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Integral numbers print without a fractional part ("3", not "3.0")
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Absent => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_typing() {
        assert_eq!(Value::from_raw(""), Value::Absent);
        assert_eq!(Value::from_raw("   "), Value::Absent);
        assert_eq!(Value::from_raw("22"), Value::Number(22.0));
        assert_eq!(Value::from_raw(" 7.25 "), Value::Number(7.25));
        assert_eq!(Value::from_raw(" male "), Value::text("male"));
        assert_eq!(Value::from_raw("12abc"), Value::text("12abc"));
    }

    #[test]
    fn test_non_finite_tokens_stay_text() {
        assert_eq!(Value::from_raw("NaN"), Value::text("NaN"));
        assert_eq!(Value::from_raw("inf"), Value::text("inf"));
    }

    #[test]
    fn test_display_integral_numbers() {
        assert_eq!(Value::Number(892.0).to_string(), "892");
        assert_eq!(Value::Number(71.2833).to_string(), "71.2833");
        assert_eq!(Value::Absent.to_string(), "");
    }
}
