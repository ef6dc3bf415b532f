//! Typed property slots and the scalar values they hold

use crate::error::{OgmError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A scalar value bound to a property or query parameter
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Whether the value is unset
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The text, if this is a `Text` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, if this is an `Integer` value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Coercion applied to every value assigned to a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    Text,
    Integer,
    Float,
    Boolean,
}

impl PropertyType {
    /// Convert `value` into this type. `Null` passes through unchanged.
    pub fn coerce(self, value: Value) -> Result<Value> {
        let fail = |value: &Value| OgmError::Coercion {
            value: value.to_string(),
            target: self,
        };

        let coerced = match (self, value) {
            (_, Value::Null) => Value::Null,

            (PropertyType::Text, Value::Text(s)) => Value::Text(s),
            (PropertyType::Text, Value::Integer(i)) => Value::Text(i.to_string()),
            (PropertyType::Text, Value::Float(x)) => Value::Text(x.to_string()),
            (PropertyType::Text, Value::Boolean(b)) => Value::Text(b.to_string()),

            (PropertyType::Integer, Value::Integer(i)) => Value::Integer(i),
            (PropertyType::Integer, Value::Boolean(b)) => Value::Integer(i64::from(b)),
            (PropertyType::Integer, v @ Value::Float(x)) => {
                // i64::MIN is exactly -2^63; i64::MAX rounds up to 2^63
                if !x.is_finite() || x < i64::MIN as f64 || x >= i64::MAX as f64 {
                    return Err(fail(&v));
                }
                Value::Integer(x.trunc() as i64)
            }
            (PropertyType::Integer, v @ Value::Text(_)) => {
                let parsed = v.as_str().and_then(|s| s.trim().parse::<i64>().ok());
                match parsed {
                    Some(i) => Value::Integer(i),
                    None => return Err(fail(&v)),
                }
            }

            (PropertyType::Float, Value::Float(x)) => Value::Float(x),
            (PropertyType::Float, Value::Integer(i)) => Value::Float(i as f64),
            (PropertyType::Float, Value::Boolean(b)) => Value::Float(if b { 1.0 } else { 0.0 }),
            (PropertyType::Float, v @ Value::Text(_)) => {
                let parsed = v.as_str().and_then(|s| s.trim().parse::<f64>().ok());
                match parsed {
                    Some(x) => Value::Float(x),
                    None => return Err(fail(&v)),
                }
            }

            (PropertyType::Boolean, Value::Boolean(b)) => Value::Boolean(b),
            (PropertyType::Boolean, Value::Integer(i)) => Value::Boolean(i != 0),
            (PropertyType::Boolean, v @ Value::Text(_)) => {
                let text = v.as_str().map(str::trim).unwrap_or_default();
                if text.eq_ignore_ascii_case("true") {
                    Value::Boolean(true)
                } else if text.eq_ignore_ascii_case("false") {
                    Value::Boolean(false)
                } else {
                    return Err(fail(&v));
                }
            }
            (PropertyType::Boolean, v @ Value::Float(_)) => return Err(fail(&v)),
        };

        Ok(coerced)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyType::Text => "text",
            PropertyType::Integer => "integer",
            PropertyType::Float => "float",
            PropertyType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "str" | "string" => Ok(PropertyType::Text),
            "int" | "integer" => Ok(PropertyType::Integer),
            "float" => Ok(PropertyType::Float),
            "bool" | "boolean" => Ok(PropertyType::Boolean),
            other => Err(format!("unknown property type: {}", other)),
        }
    }
}

/// A named slot on a node. Starts unset (`Value::Null`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Property {
    ty: PropertyType,
    value: Value,
}

impl Property {
    /// A text property
    pub fn new() -> Self {
        Self::default()
    }

    /// An unset property with the given coercion
    pub fn typed(ty: PropertyType) -> Self {
        Self {
            ty,
            value: Value::Null,
        }
    }

    /// An unset integer property
    pub fn integer() -> Self {
        Self::typed(PropertyType::Integer)
    }

    /// An unset float property
    pub fn float() -> Self {
        Self::typed(PropertyType::Float)
    }

    /// An unset boolean property
    pub fn boolean() -> Self {
        Self::typed(PropertyType::Boolean)
    }

    /// The coercion applied on assignment
    pub fn property_type(&self) -> PropertyType {
        self.ty
    }

    /// The current value, `Null` when unset
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Coerce and store a value. The previous value is kept on failure.
    pub fn set(&mut self, value: impl Into<Value>) -> Result<&Value> {
        self.value = self.ty.coerce(value.into())?;
        Ok(&self.value)
    }

    /// Reset to `Null`
    pub fn clear(&mut self) {
        self.value = Value::Null;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_property_is_unset_text() {
        let prop = Property::new();
        assert_eq!(prop.property_type(), PropertyType::Text);
        assert!(prop.value().is_null());
    }

    #[test]
    fn test_integer_property_coerces_text() {
        let mut prop = Property::integer();
        prop.set("29").unwrap();
        assert_eq!(prop.value(), &Value::Integer(29));
        prop.set(" 7 ").unwrap();
        assert_eq!(prop.value(), &Value::Integer(7));
    }

    #[test]
    fn test_failed_coercion_keeps_previous_value() {
        let mut prop = Property::integer();
        prop.set(3).unwrap();
        let err = prop.set("twenty-nine").unwrap_err();
        assert_eq!(
            err,
            OgmError::Coercion {
                value: "\"twenty-nine\"".into(),
                target: PropertyType::Integer,
            }
        );
        assert_eq!(prop.value(), &Value::Integer(3));
    }

    #[test]
    fn test_text_property_stringifies_scalars() {
        let mut prop = Property::new();
        prop.set(42).unwrap();
        assert_eq!(prop.value(), &Value::Text("42".into()));
        prop.set(true).unwrap();
        assert_eq!(prop.value(), &Value::Text("true".into()));
    }

    #[test]
    fn test_null_passes_through_every_type() {
        for ty in [
            PropertyType::Text,
            PropertyType::Integer,
            PropertyType::Float,
            PropertyType::Boolean,
        ] {
            assert_eq!(ty.coerce(Value::Null).unwrap(), Value::Null);
        }
    }

    #[test]
    fn test_integer_truncates_floats() {
        assert_eq!(
            PropertyType::Integer.coerce(Value::Float(29.9)).unwrap(),
            Value::Integer(29)
        );
        assert!(PropertyType::Integer.coerce(Value::Float(f64::NAN)).is_err());
    }

    #[test]
    fn test_integer_range_edges() {
        assert_eq!(
            PropertyType::Integer
                .coerce(Value::Float(-9223372036854775808.0))
                .unwrap(),
            Value::Integer(i64::MIN)
        );
        assert!(PropertyType::Integer.coerce(Value::Float(9.3e18)).is_err());
        assert!(PropertyType::Integer.coerce(Value::Float(-9.3e18)).is_err());
        assert!(PropertyType::Integer
            .coerce(Value::Float(9223372036854775808.0))
            .is_err());
    }

    #[test]
    fn test_boolean_parsing() {
        assert_eq!(
            PropertyType::Boolean.coerce("TRUE".into()).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            PropertyType::Boolean.coerce(Value::Integer(0)).unwrap(),
            Value::Boolean(false)
        );
        assert!(PropertyType::Boolean.coerce("yes".into()).is_err());
    }

    #[test]
    fn test_float_widens_integers() {
        assert_eq!(
            PropertyType::Float.coerce(Value::Integer(2)).unwrap(),
            Value::Float(2.0)
        );
        assert_eq!(
            PropertyType::Float.coerce("1.5".into()).unwrap(),
            Value::Float(1.5)
        );
    }

    #[test]
    fn test_property_type_from_str() {
        assert_eq!("int".parse::<PropertyType>(), Ok(PropertyType::Integer));
        assert_eq!("Boolean".parse::<PropertyType>(), Ok(PropertyType::Boolean));
        assert!("date".parse::<PropertyType>().is_err());
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }
}
