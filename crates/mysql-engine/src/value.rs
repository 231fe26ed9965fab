//! Fixture values to `mysql_async` parameters.

use mysql_async::{Params, Value};
use serde_json::Value as JsonValue;

/// Convert a fixture value into a MySQL parameter.
///
/// Arrays and objects are sent as JSON text, which MySQL accepts for `JSON`
/// and text columns alike.
pub(crate) fn to_mysql_value(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::NULL,
        JsonValue::Bool(b) => Value::Int(i64::from(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                n.as_f64().map_or(Value::NULL, Value::Double)
            }
        }
        JsonValue::String(s) => Value::Bytes(s.as_bytes().to_vec()),
        JsonValue::Array(_) | JsonValue::Object(_) => Value::Bytes(value.to_string().into_bytes()),
    }
}

pub(crate) fn to_params(args: &[JsonValue]) -> Params {
    if args.is_empty() {
        Params::Empty
    } else {
        Params::Positional(args.iter().map(to_mysql_value).collect())
    }
}
