//! Parameters passed along with authorization requests.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::BuiltinError;

use super::typed_value::TypedValue;

/// The subset of [`TypedValue`] accepted as an authorization input parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum InputParam {
    String(String),
    Bool(bool),
    Integer(i64),
    Double(f64),
    Time(DateTime<Utc>),
    Duration(TimeDelta),
    Array(Vec<TypedValue>),
    Map(BTreeMap<String, TypedValue>),
}

impl TryFrom<TypedValue> for InputParam {
    type Error = BuiltinError;

    fn try_from(value: TypedValue) -> Result<Self, Self::Error> {
        match value {
            TypedValue::String(s) => Ok(InputParam::String(s)),
            TypedValue::Bool(b) => Ok(InputParam::Bool(b)),
            TypedValue::Integer(n) => Ok(InputParam::Integer(n)),
            TypedValue::Double(f) => Ok(InputParam::Double(f)),
            TypedValue::Time(t) => Ok(InputParam::Time(t)),
            TypedValue::Duration(d) => Ok(InputParam::Duration(d)),
            TypedValue::Array(items) => Ok(InputParam::Array(items)),
            TypedValue::Map(fields) => Ok(InputParam::Map(fields)),
            other => Err(BuiltinError::UnsupportedValueKind {
                kind: other.kind().to_string(),
            }),
        }
    }
}

impl From<InputParam> for TypedValue {
    fn from(param: InputParam) -> Self {
        match param {
            InputParam::String(s) => TypedValue::String(s),
            InputParam::Bool(b) => TypedValue::Bool(b),
            InputParam::Integer(n) => TypedValue::Integer(n),
            InputParam::Double(f) => TypedValue::Double(f),
            InputParam::Time(t) => TypedValue::Time(t),
            InputParam::Duration(d) => TypedValue::Duration(d),
            InputParam::Array(items) => TypedValue::Array(items),
            InputParam::Map(fields) => TypedValue::Map(fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_values_convert() {
        assert_eq!(
            InputParam::try_from(TypedValue::from("42")).unwrap(),
            InputParam::String("42".to_string())
        );
        assert_eq!(
            InputParam::try_from(TypedValue::Integer(42)).unwrap(),
            InputParam::Integer(42)
        );
    }

    #[test]
    fn test_values_outside_the_parameter_set_are_rejected() {
        let err = InputParam::try_from(TypedValue::UnsignedInteger(1)).unwrap_err();
        assert!(matches!(
            err,
            BuiltinError::UnsupportedValueKind { kind } if kind == "unsigned_integer"
        ));
        assert!(InputParam::try_from(TypedValue::Null).is_err());
    }

    #[test]
    fn test_back_into_typed_value() {
        let param = InputParam::Array(vec![TypedValue::Bool(true)]);
        assert_eq!(
            TypedValue::from(param),
            TypedValue::Array(vec![TypedValue::Bool(true)])
        );
    }
}
