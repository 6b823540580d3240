//! Conversion between policy-side JSON trees and [`TypedValue`].
//!
//! Decoding probes a fixed, ordered table of alias groups. Within a group the
//! first present key wins and the others are ignored.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};
use strum_macros::AsRefStr;

use crate::error::BuiltinError;
use crate::types::{GeoPoint, TypedValue};

/// The decodable value kinds, in probing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ValueKind {
    String,
    Bool,
    Integer,
    Double,
    Time,
    Duration,
    Array,
    Map,
}

/// Synonymous keys for one value kind, canonical spelling first.
#[derive(Debug, Clone, Copy)]
pub struct AliasGroup {
    pub kind: ValueKind,
    pub keys: &'static [&'static str],
}

impl AliasGroup {
    fn lookup<'a>(&self, object: &'a Map<String, Value>) -> Option<(&'static str, &'a Value)> {
        self.keys
            .iter()
            .find_map(|key| object.get(*key).map(|value| (*key, value)))
    }
}

pub const ALIAS_GROUPS: [AliasGroup; 8] = [
    AliasGroup {
        kind: ValueKind::String,
        keys: &["string_value", "stringValue"],
    },
    AliasGroup {
        kind: ValueKind::Bool,
        keys: &["bool_value", "boolValue"],
    },
    AliasGroup {
        kind: ValueKind::Integer,
        keys: &["integer_value", "integerValue"],
    },
    AliasGroup {
        kind: ValueKind::Double,
        keys: &["double_value", "doubleValue"],
    },
    AliasGroup {
        kind: ValueKind::Time,
        keys: &["time_value", "timeValue"],
    },
    AliasGroup {
        kind: ValueKind::Duration,
        keys: &["duration_value", "durationValue"],
    },
    AliasGroup {
        kind: ValueKind::Array,
        keys: &["array_value", "arrayValue"],
    },
    AliasGroup {
        kind: ValueKind::Map,
        keys: &["map_value", "mapValue"],
    },
];

const VALUES_KEY: &str = "values";
const FIELDS_KEY: &str = "fields";

/// Decode a tagged object such as `{"string_value": "x"}`.
///
/// Returns `Ok(None)` for an empty object.
pub fn decode(value: &Value) -> Result<Option<TypedValue>, BuiltinError> {
    let Some(object) = value.as_object() else {
        return Err(BuiltinError::type_mismatch("value", value, "object"));
    };
    if object.is_empty() {
        return Ok(None);
    }

    for group in ALIAS_GROUPS.iter() {
        let Some((key, raw)) = group.lookup(object) else {
            continue;
        };
        let decoded = match group.kind {
            ValueKind::String => raw
                .as_str()
                .map(|s| TypedValue::String(s.to_string()))
                .ok_or_else(|| BuiltinError::type_mismatch(key, raw, "string"))?,
            ValueKind::Bool => raw
                .as_bool()
                .map(TypedValue::Bool)
                .ok_or_else(|| BuiltinError::type_mismatch(key, raw, "boolean"))?,
            ValueKind::Integer => raw
                .as_i64()
                .map(TypedValue::Integer)
                .ok_or_else(|| BuiltinError::type_mismatch(key, raw, "integer"))?,
            ValueKind::Double => raw
                .as_f64()
                .map(TypedValue::Double)
                .ok_or_else(|| BuiltinError::type_mismatch(key, raw, "number"))?,
            ValueKind::Time => raw
                .as_str()
                .and_then(parse_time)
                .map(TypedValue::Time)
                .ok_or_else(|| BuiltinError::type_mismatch(key, raw, "RFC 3339 time"))?,
            ValueKind::Duration => raw
                .as_str()
                .and_then(parse_duration)
                .map(TypedValue::Duration)
                .ok_or_else(|| BuiltinError::type_mismatch(key, raw, "duration"))?,
            ValueKind::Array => {
                let Some(values) = raw.get(VALUES_KEY) else {
                    continue;
                };
                let Some(items) = values.as_array() else {
                    return Err(BuiltinError::type_mismatch(VALUES_KEY, values, "array"));
                };
                TypedValue::Array(
                    items
                        .iter()
                        .map(decode_element)
                        .collect::<Result<Vec<_>, _>>()?,
                )
            }
            ValueKind::Map => {
                let Some(fields) = raw.get(FIELDS_KEY) else {
                    continue;
                };
                let Some(entries) = fields.as_object() else {
                    return Err(BuiltinError::type_mismatch(FIELDS_KEY, fields, "object"));
                };
                TypedValue::Map(
                    entries
                        .iter()
                        .map(|(name, entry)| Ok((name.clone(), decode_element(entry)?)))
                        .collect::<Result<BTreeMap<_, _>, BuiltinError>>()?,
                )
            }
        };
        return Ok(Some(decoded));
    }

    Err(BuiltinError::type_mismatch(
        object.keys().join(","),
        value,
        "tagged value",
    ))
}

// Nested elements are always present, so an empty one stands for null.
fn decode_element(value: &Value) -> Result<TypedValue, BuiltinError> {
    Ok(decode(value)?.unwrap_or(TypedValue::Null))
}

/// Type a literal by its JSON shape, falling back to [`decode`] for objects.
///
/// `66` is an integer, `66.0` and `66.66` are doubles. `null` is rejected.
pub fn infer(value: &Value) -> Result<Option<TypedValue>, BuiltinError> {
    match value {
        Value::Null => Err(BuiltinError::type_mismatch("value", value, "literal")),
        Value::Bool(b) => Ok(Some(TypedValue::Bool(*b))),
        Value::String(s) => Ok(Some(TypedValue::String(s.clone()))),
        Value::Number(n) => infer_number(n)
            .map(Some)
            .ok_or_else(|| BuiltinError::type_mismatch("value", value, "number")),
        Value::Array(items) => Ok(Some(TypedValue::Array(
            items
                .iter()
                .map(|item| Ok(infer(item)?.unwrap_or(TypedValue::Null)))
                .collect::<Result<Vec<_>, BuiltinError>>()?,
        ))),
        Value::Object(_) => decode(value),
    }
}

fn infer_number(n: &Number) -> Option<TypedValue> {
    if let Some(i) = n.as_i64() {
        Some(TypedValue::Integer(i))
    } else {
        n.as_f64().map(TypedValue::Double)
    }
}

/// Render a typed value as a plain policy value.
///
/// Bytes become base64, geo-points `POINT (<lat> <lon>)`, times RFC 3339
/// strings and durations `<seconds>s` strings. Opaque values have no rendering.
pub fn encode(value: &TypedValue) -> Result<Value, BuiltinError> {
    Ok(match value {
        TypedValue::Null => Value::Null,
        TypedValue::Bool(b) => Value::Bool(*b),
        TypedValue::Integer(n) => Value::from(*n),
        TypedValue::UnsignedInteger(n) => Value::from(*n),
        TypedValue::Double(f) => Number::from_f64(*f).map(Value::Number).ok_or_else(|| {
            BuiltinError::UnsupportedValueKind {
                kind: format!("double({f})"),
            }
        })?,
        TypedValue::String(s) => Value::String(s.clone()),
        TypedValue::Bytes(bytes) => Value::String(STANDARD.encode(bytes)),
        TypedValue::GeoPoint(GeoPoint {
            latitude,
            longitude,
        }) => Value::String(format!("POINT ({latitude} {longitude})")),
        TypedValue::Time(t) => Value::String(format_time(t)),
        TypedValue::Duration(d) => Value::String(format_duration(*d)),
        TypedValue::Array(items) => {
            Value::Array(items.iter().map(encode).collect::<Result<Vec<_>, _>>()?)
        }
        TypedValue::Map(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| Ok((k.clone(), encode(v)?)))
                .collect::<Result<Map<_, _>, BuiltinError>>()?,
        ),
        TypedValue::Any { .. } => {
            return Err(BuiltinError::UnsupportedValueKind {
                kind: value.kind().to_string(),
            });
        }
    })
}

/// Parse RFC 3339, also accepting offsets without a colon (`-0300`).
pub fn parse_time(input: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .or_else(|_| DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|t| t.with_timezone(&Utc))
        .ok()
}

pub fn format_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|μs|ms|s|m|h))+$")
        .expect("valid duration grammar")
});

static DURATION_PART_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d*)(?:\.(\d*))?(ns|us|µs|μs|ms|s|m|h)").expect("valid duration part")
});

fn unit_nanos(unit: &str) -> i128 {
    match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60_000_000_000,
        _ => 3_600_000_000_000,
    }
}

/// Parse a duration such as `1h30m`, `66.003s` or `-1.5ms`.
pub fn parse_duration(input: &str) -> Option<TimeDelta> {
    if input == "0" {
        return Some(TimeDelta::zero());
    }
    if !DURATION_RE.is_match(input) {
        return None;
    }
    let negative = input.starts_with('-');

    let mut total: i128 = 0;
    for part in DURATION_PART_RE.captures_iter(input) {
        let unit = unit_nanos(part.get(3).map_or("h", |m| m.as_str()));
        let whole = part.get(1).map_or("", |m| m.as_str());
        if !whole.is_empty() {
            total = total.checked_add(whole.parse::<i128>().ok()?.checked_mul(unit)?)?;
        }
        // Digits past nanosecond resolution of the largest unit carry nothing.
        let fraction: String = part
            .get(2)
            .map_or("", |m| m.as_str())
            .chars()
            .take(15)
            .collect();
        if !fraction.is_empty() {
            let scale = 10_i128.pow(fraction.len() as u32);
            let nanos = fraction.parse::<i128>().ok()?.checked_mul(unit)? / scale;
            total = total.checked_add(nanos)?;
        }
        if total > i64::MAX as i128 {
            return None;
        }
    }

    let nanos = i64::try_from(if negative { -total } else { total }).ok()?;
    Some(TimeDelta::nanoseconds(nanos))
}

/// Render a duration as seconds with up to nine fractional digits, e.g. `66.003s`.
pub fn format_duration(d: TimeDelta) -> String {
    let sign = if d < TimeDelta::zero() { "-" } else { "" };
    let secs = d.num_seconds().unsigned_abs();
    let nanos = d.subsec_nanos().unsigned_abs();
    if nanos == 0 {
        return format!("{sign}{secs}s");
    }
    let fraction = format!("{nanos:09}");
    format!("{sign}{secs}.{}s", fraction.trim_end_matches('0'))
}
