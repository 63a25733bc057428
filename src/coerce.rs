use serde_json::{Number, Value};

use crate::error::{Error, Result};

/// Type of the template value being replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Boolean,
    String,
}

impl ValueKind {
    /// Arrays and nulls are replaced as strings.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            _ => Self::String,
        }
    }
}

/// Turn a raw variable value into the template's type. `name` is only used for errors.
pub fn coerce(name: &str, raw: Option<&str>, kind: ValueKind) -> Result<Value> {
    match kind {
        ValueKind::Number => coerce_number(name, raw),
        ValueKind::Boolean => coerce_bool(name, raw),
        ValueKind::String => Ok(Value::String(raw.unwrap_or_default().to_string())),
    }
}

fn coerce_number(name: &str, raw: Option<&str>) -> Result<Value> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(Value::from(0)),
    };

    let invalid = || Error::InvalidNumber {
        name: name.to_string(),
        value: raw.to_string(),
    };

    let parsed: f64 = raw.parse().map_err(|_| invalid())?;
    number_from_f64(parsed).map(Value::Number).ok_or_else(invalid)
}

/// Integral values are written without a fractional part, as `45` rather than `45.0`.
fn number_from_f64(n: f64) -> Option<Number> {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        return Some(Number::from(n as i64));
    }
    Number::from_f64(n)
}

fn coerce_bool(name: &str, raw: Option<&str>) -> Result<Value> {
    let normalized = match raw.map(str::to_ascii_lowercase) {
        Some(v) if v == "true" || v == "false" => v,
        _ => "false".to_string(),
    };

    normalized
        .parse::<bool>()
        .map(Value::Bool)
        .map_err(|_| Error::InvalidBoolean {
            name: name.to_string(),
            value: raw.unwrap_or_default().to_string(),
        })
}
