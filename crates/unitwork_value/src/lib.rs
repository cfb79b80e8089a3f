//! # Unitwork Value
//!
//! Value shapes and property paths for change-tracked entities.
//!
//! Entities expose their tracked state as [`Value`] trees. The model is
//! closed (scalars, sequences, mappings, nested records), owned, and
//! compared structurally, which gives:
//! - Deep copies for free (`Clone`)
//! - Structural equality for change detection (`PartialEq`)
//! - Lossless hand-off to serde-based backends
//!
//! ## Usage
//!
//! ```
//! use unitwork_value::{PropertyPath, Value};
//!
//! let profile = Value::map([("city", Value::from("Warsaw"))]);
//! let path = PropertyPath::parse("profile.city").unwrap();
//!
//! assert_eq!(path.root(), "profile");
//! assert_eq!(profile.resolve(path.tail()), Some(&Value::from("Warsaw")));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod json;
mod path;
mod value;

pub use error::{ValueError, ValueResult};
pub use path::{PropertyPath, Segment};
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Integer),
            "[a-z]{0,8}".prop_map(Value::Text),
        ]
    }

    fn value() -> impl Strategy<Value = Value> {
        leaf().prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..4).prop_map(Value::Map),
            ]
        })
    }

    proptest! {
        #[test]
        fn json_conversion_preserves_non_byte_values(v in value()) {
            let json = serde_json::Value::from(v.clone());
            prop_assert_eq!(Value::try_from(json).unwrap(), v);
        }

        #[test]
        fn serde_representation_is_stable(v in value()) {
            let encoded = serde_json::to_string(&v).unwrap();
            let decoded: Value = serde_json::from_str(&encoded).unwrap();
            prop_assert_eq!(decoded, v);
        }
    }
}
