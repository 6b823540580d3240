//! Closed tagged values exchanged with the authorization service.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde_json::{Map, Value, json};
use strum_macros::AsRefStr;

use crate::codec::format_duration;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Wire-level value with exactly one populated variant.
#[derive(Debug, Clone, PartialEq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TypedValue {
    Null,
    Bool(bool),
    Integer(i64),
    UnsignedInteger(u64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    GeoPoint(GeoPoint),
    Time(DateTime<Utc>),
    Duration(TimeDelta),
    Array(Vec<TypedValue>),
    Map(BTreeMap<String, TypedValue>),
    /// Opaque payload; has no policy-side representation.
    Any { type_url: String, value: Vec<u8> },
}

impl TypedValue {
    /// Name of the populated variant, e.g. `"geo_point"`.
    pub fn kind(&self) -> &str {
        self.as_ref()
    }

    /// Render the tagged wire form, e.g. `{"stringValue": "x"}`.
    ///
    /// For every variant the codec can decode, `codec::decode(&v.to_wire())`
    /// yields `v` again.
    pub fn to_wire(&self) -> Value {
        match self {
            TypedValue::Null => json!({ "nullValue": null }),
            TypedValue::Bool(b) => json!({ "boolValue": b }),
            TypedValue::Integer(n) => json!({ "integerValue": n }),
            TypedValue::UnsignedInteger(n) => json!({ "unsignedIntegerValue": n }),
            TypedValue::Double(f) => json!({ "doubleValue": f }),
            TypedValue::String(s) => json!({ "stringValue": s }),
            TypedValue::Bytes(b) => json!({ "bytesValue": STANDARD.encode(b) }),
            TypedValue::GeoPoint(p) => json!({
                "geoPointValue": { "latitude": p.latitude, "longitude": p.longitude }
            }),
            TypedValue::Time(t) => {
                json!({ "timeValue": t.to_rfc3339_opts(SecondsFormat::AutoSi, true) })
            }
            TypedValue::Duration(d) => json!({ "durationValue": format_duration(*d) }),
            TypedValue::Array(items) => json!({
                "arrayValue": { "values": items.iter().map(TypedValue::to_wire).collect::<Vec<_>>() }
            }),
            TypedValue::Map(fields) => {
                let fields: Map<String, Value> = fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_wire()))
                    .collect();
                json!({ "mapValue": { "fields": fields } })
            }
            TypedValue::Any { type_url, value } => json!({
                "anyValue": { "typeUrl": type_url, "value": STANDARD.encode(value) }
            }),
        }
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::String(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::String(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Bool(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        TypedValue::Integer(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::Double(value)
    }
}
