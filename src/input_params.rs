//! Named authorization input parameters.

use serde_json::Value;
use tracing::debug;

use crate::codec;
use crate::error::BuiltinError;
use crate::types::{InputParam, InputParams};

/// How parameter values are written by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSyntax {
    /// Every value is a tagged object, e.g. `{"string_value": "x"}`.
    Tagged,
    /// Bare literals are typed by their shape; objects are read as tagged.
    Inferred,
}

/// Parse a map of named parameters.
///
/// Parameters are optional: an absent or non-object input yields an empty map.
pub fn parse_input_params(
    input: Option<&Value>,
    syntax: ParamSyntax,
) -> Result<InputParams, BuiltinError> {
    let Some(object) = input.and_then(Value::as_object) else {
        return Ok(InputParams::new());
    };

    let mut params = InputParams::new();
    for (name, value) in object {
        let invalid = || BuiltinError::InvalidInputParameter {
            name: name.clone(),
            value: value.clone(),
        };
        let decoded = match syntax {
            ParamSyntax::Tagged => codec::decode(value),
            ParamSyntax::Inferred => codec::infer(value),
        }
        .map_err(|_| invalid())?;

        if let Some(typed) = decoded {
            params.insert(name.clone(), InputParam::try_from(typed).map_err(|_| invalid())?);
        }
    }

    debug!(
        event = "InputParams",
        phase = "Parsed",
        syntax = ?syntax,
        count = params.len()
    );
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypedValue;
    use chrono::{TimeDelta, TimeZone, Utc};
    use serde_json::json;
    use yare::parameterized;

    #[test]
    fn test_tagged_params() {
        let input = json!({
            "name": {"string_value": "alice"},
            "age": {"integerValue": 42},
            "ratio": {"double_value": 0.5},
            "active": {"bool_value": true},
            "since": {"time_value": "2020-08-08T08:08:08Z"},
            "ttl": {"duration_value": "66.003s"},
            "tags": {"array_value": {"values": [{"string_value": "a"}]}},
            "meta": {"map_value": {"fields": {"k": {"integer_value": 1}}}}
        });
        let params = parse_input_params(Some(&input), ParamSyntax::Tagged).unwrap();

        assert_eq!(params.len(), 8);
        assert_eq!(params["name"], InputParam::String("alice".to_string()));
        assert_eq!(params["age"], InputParam::Integer(42));
        assert_eq!(params["ratio"], InputParam::Double(0.5));
        assert_eq!(params["active"], InputParam::Bool(true));
        assert_eq!(
            params["since"],
            InputParam::Time(Utc.with_ymd_and_hms(2020, 8, 8, 8, 8, 8).unwrap())
        );
        assert_eq!(
            params["ttl"],
            InputParam::Duration(TimeDelta::milliseconds(66_003))
        );
        assert_eq!(
            params["tags"],
            InputParam::Array(vec![TypedValue::from("a")])
        );
        assert!(matches!(&params["meta"], InputParam::Map(fields) if fields["k"] == TypedValue::Integer(1)));
    }

    #[parameterized(
        absent = { None },
        null = { Some(json!(null)) },
        string = { Some(json!("params")) },
        array = { Some(json!([1, 2])) },
    )]
    fn test_missing_params_are_empty(input: Option<Value>) {
        let params = parse_input_params(input.as_ref(), ParamSyntax::Tagged).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_empty_tagged_value_is_skipped() {
        let input = json!({"skip": {}, "keep": {"bool_value": false}});
        let params = parse_input_params(Some(&input), ParamSyntax::Tagged).unwrap();
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["keep"]);
    }

    #[parameterized(
        bare_literal = { json!({"p": "x"}) },
        unknown_tag = { json!({"p": {"bogus": 1}}) },
        wrong_shape = { json!({"p": {"string_value": 1}}) },
    )]
    fn test_tagged_invalid_parameter_names_the_parameter(input: Value) {
        let err = parse_input_params(Some(&input), ParamSyntax::Tagged).unwrap_err();
        match err {
            BuiltinError::InvalidInputParameter { name, value } => {
                assert_eq!(name, "p");
                assert_eq!(value, input["p"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_inferred_literals() {
        let input = json!({
            "count": 66,
            "whole": 66.0,
            "ratio": 66.66,
            "name": "x",
            "flag": true,
            "list": ["a", 2],
            "tagged": {"stringValue": "y"}
        });
        let params = parse_input_params(Some(&input), ParamSyntax::Inferred).unwrap();

        assert_eq!(params["count"], InputParam::Integer(66));
        assert_eq!(params["whole"], InputParam::Double(66.0));
        assert_eq!(params["ratio"], InputParam::Double(66.66));
        assert_eq!(params["name"], InputParam::String("x".to_string()));
        assert_eq!(params["flag"], InputParam::Bool(true));
        assert_eq!(
            params["list"],
            InputParam::Array(vec![TypedValue::from("a"), TypedValue::Integer(2)])
        );
        assert_eq!(params["tagged"], InputParam::String("y".to_string()));
    }

    #[test]
    fn test_inferred_null_is_invalid() {
        let input = json!({"nothing": null});
        let err = parse_input_params(Some(&input), ParamSyntax::Inferred).unwrap_err();
        assert_eq!(err.to_string(), "invalid input parameter nothing: null");
    }
}
