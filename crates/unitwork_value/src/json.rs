//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! Handlers often ship change sets to a JSON backend; these conversions
//! keep that boundary lossless for every shape except floats, which the
//! value model rejects.

use crate::error::{ValueError, ValueResult};
use crate::value::Value;
use serde_json::Value as Json;

impl TryFrom<Json> for Value {
    type Error = ValueError;

    fn try_from(json: Json) -> ValueResult<Self> {
        Ok(match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Integer(n.as_i64().ok_or(ValueError::FloatUnsupported)?),
            Json::String(s) => Value::Text(s),
            Json::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<ValueResult<_>>()?,
            ),
            Json::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| Ok((k, Value::try_from(v)?)))
                    .collect::<ValueResult<_>>()?,
            ),
        })
    }
}

impl From<Value> for Json {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(b),
            Value::Integer(n) => Json::from(n),
            Value::Text(s) => Json::String(s),
            Value::Bytes(b) => Json::Array(b.into_iter().map(Json::from).collect()),
            Value::Array(items) => Json::Array(items.into_iter().map(Json::from).collect()),
            Value::Map(entries) => {
                Json::Object(entries.into_iter().map(|(k, v)| (k, Json::from(v))).collect())
            }
        }
    }
}
