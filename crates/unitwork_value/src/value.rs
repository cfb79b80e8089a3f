//! Dynamic value type exposed by tracked entities.

use crate::error::{ValueError, ValueResult};
use crate::path::Segment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dynamic property value.
///
/// This is the closed set of shapes an entity can expose for change
/// tracking. Every variant owns its contents, so cloning a value is a
/// full deep copy and two values never share mutable state.
///
/// Floats are intentionally not supported: equality must be total for
/// change detection to be reliable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer (supports full i64 range).
    Integer(i64),
    /// Text string (UTF-8).
    Text(String),
    /// Byte string.
    Bytes(Vec<u8>),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Mapping from names to values; also used for nested records.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Creates a map value from name/value pairs.
    ///
    /// Later pairs win when a name is repeated.
    pub fn map<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns a short name of this value's shape, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Whether this value counts as "no identity assigned".
    ///
    /// Null, `false`, zero, and empty text, bytes, arrays and maps are
    /// unassigned. Everything else is assigned.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Integer(n) => *n == 0,
            Value::Text(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::Map(m) => m.is_empty(),
        }
    }

    /// Nesting depth of this value. Scalars have depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Value::Array(items) => 1 + items.iter().map(Value::depth).max().unwrap_or(0),
            Value::Map(entries) => 1 + entries.values().map(Value::depth).max().unwrap_or(0),
            _ => 1,
        }
    }

    /// Descends into this value following `segments`.
    ///
    /// Maps are indexed by key, arrays by numeric segment. Returns `None`
    /// as soon as a segment does not resolve.
    pub fn resolve(&self, segments: &[Segment]) -> Option<&Value> {
        let mut current = self;
        for segment in segments {
            current = match current {
                Value::Map(entries) => entries.get(segment.as_str())?,
                Value::Array(items) => items.get(segment.as_index()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a string, if it is a text string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as bytes, if it is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get this value as a map, if it is one.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a key in this map value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(m: BTreeMap<String, Value>) -> Self {
        Value::Map(m)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

impl TryFrom<Value> for bool {
    type Error = ValueError;

    fn try_from(value: Value) -> ValueResult<Self> {
        value
            .as_bool()
            .ok_or_else(|| ValueError::type_mismatch("bool", value.kind()))
    }
}

impl TryFrom<Value> for i64 {
    type Error = ValueError;

    fn try_from(value: Value) -> ValueResult<Self> {
        value
            .as_integer()
            .ok_or_else(|| ValueError::type_mismatch("integer", value.kind()))
    }
}

impl TryFrom<Value> for String {
    type Error = ValueError;

    fn try_from(value: Value) -> ValueResult<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(ValueError::type_mismatch("text", other.kind())),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = ValueError;

    fn try_from(value: Value) -> ValueResult<Self> {
        match value {
            Value::Bytes(b) => Ok(b),
            other => Err(ValueError::type_mismatch("bytes", other.kind())),
        }
    }
}

impl TryFrom<Value> for BTreeMap<String, Value> {
    type Error = ValueError;

    fn try_from(value: Value) -> ValueResult<Self> {
        match value {
            Value::Map(m) => Ok(m),
            other => Err(ValueError::type_mismatch("map", other.kind())),
        }
    }
}

macro_rules! try_from_optional {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<Value> for Option<$ty> {
                type Error = ValueError;

                fn try_from(value: Value) -> ValueResult<Self> {
                    match value {
                        Value::Null => Ok(None),
                        other => <$ty>::try_from(other).map(Some),
                    }
                }
            }
        )*
    };
}

macro_rules! try_from_sequence {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<Value> for Vec<$ty> {
                type Error = ValueError;

                fn try_from(value: Value) -> ValueResult<Self> {
                    match value {
                        Value::Array(items) => items.into_iter().map(<$ty>::try_from).collect(),
                        other => Err(ValueError::type_mismatch("array", other.kind())),
                    }
                }
            }
        )*
    };
}

try_from_optional!(bool, i64, String);
try_from_sequence!(bool, i64, String);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PropertyPath;

    #[test]
    fn unassigned_values() {
        assert!(Value::Null.is_unassigned());
        assert!(Value::Integer(0).is_unassigned());
        assert!(Value::Text(String::new()).is_unassigned());
        assert!(Value::Bool(false).is_unassigned());
        assert!(Value::Array(vec![]).is_unassigned());

        assert!(!Value::Integer(1).is_unassigned());
        assert!(!Value::Integer(-1).is_unassigned());
        assert!(!Value::from("a").is_unassigned());
        assert!(!Value::Bytes(vec![0]).is_unassigned());
    }

    #[test]
    fn map_equality_ignores_insertion_order() {
        let a = Value::map([("a", Value::from(1)), ("b", Value::from(2))]);
        let b = Value::map([("b", Value::from(2)), ("a", Value::from(1))]);
        assert_eq!(a, b);
    }

    #[test]
    fn nested_inequality_is_detected() {
        let a = Value::map([("items", Value::from(vec!["x", "y"]))]);
        let b = Value::map([("items", Value::from(vec!["x", "z"]))]);
        assert_ne!(a, b);
    }

    #[test]
    fn clone_is_independent() {
        let original = Value::map([("tags", Value::from(vec!["a"]))]);
        let mut copy = original.clone();
        if let Value::Map(entries) = &mut copy {
            entries.insert("tags".into(), Value::from(vec!["b"]));
        }
        assert_eq!(original.get("tags"), Some(&Value::from(vec!["a"])));
    }

    #[test]
    fn depth_counts_nesting() {
        assert_eq!(Value::Integer(1).depth(), 1);
        assert_eq!(Value::Array(vec![]).depth(), 1);
        let nested = Value::map([("a", Value::map([("b", Value::from(vec![1i64]))]))]);
        assert_eq!(nested.depth(), 4);
    }

    #[test]
    fn resolve_through_maps_and_arrays() {
        let value = Value::map([(
            "address",
            Value::map([("lines", Value::from(vec!["1 Main St", "Apt 2"]))]),
        )]);
        let path = PropertyPath::parse("profile.address.lines.1").unwrap();
        assert_eq!(value.resolve(path.tail()), Some(&Value::from("Apt 2")));

        let missing = PropertyPath::parse("profile.address.zip").unwrap();
        assert_eq!(value.resolve(missing.tail()), None);
    }

    #[test]
    fn resolve_rejects_scalar_descent() {
        let value = Value::from("text");
        let path = PropertyPath::parse("a.b").unwrap();
        assert_eq!(value.resolve(path.tail()), None);
    }

    #[test]
    fn conversions() {
        assert_eq!(Value::from(Some(5i64)), Value::Integer(5));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Option::<i64>::try_from(Value::Null), Ok(None));
        assert_eq!(Option::<String>::try_from(Value::from("x")), Ok(Some("x".into())));
        assert_eq!(
            Vec::<String>::try_from(Value::from(vec!["a", "b"])),
            Ok(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            i64::try_from(Value::from("7")),
            Err(ValueError::type_mismatch("integer", "text"))
        );
    }
}
