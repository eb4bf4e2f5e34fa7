//! The dynamic value tree the engine operates on.
//!
//! [`Value`] is a tagged variant mirroring any well-formed JSON document.
//! It exists instead of operating directly on [`serde_json::Value`] so that
//! the engine can draw its own line between "exact JSON numeric literal" and
//! "whatever `f64` rounds it to" (see [`Number`]), which RFC 6902 `test`
//! semantics depend on.

use std::fmt;

use serde_json::Number as JsonNumber;

/// An exact JSON numeric literal, preserving integer/float distinction.
///
/// `1` and `1.0` are distinct values under this type and under
/// [`Value::structural_eq`] — collapsing both to `f64` would make
/// `test` accept a patch author's typo as a match.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// A negative integer literal.
    Int(i64),
    /// A non-negative integer literal too large for `i64`, or any
    /// non-negative integer literal (both `Int` and `UInt` represent
    /// "this literal had no decimal point").
    UInt(u64),
    /// A literal with a decimal point or exponent.
    Float(f64),
}

impl Number {
    fn as_i128(self) -> Option<i128> {
        match self {
            Number::Int(i) => Some(i128::from(i)),
            Number::UInt(u) => Some(i128::from(u)),
            Number::Float(_) => None,
        }
    }

    /// Renders the number to its canonical JSON text form.
    #[must_use]
    pub fn to_json_text(self) -> String {
        match self {
            Number::Int(i) => i.to_string(),
            Number::UInt(u) => u.to_string(),
            Number::Float(f) => {
                let mut s = f.to_string();
                if !s.contains('.') && !s.contains('e') && !s.contains("inf") && !s.contains("NaN")
                {
                    s.push_str(".0");
                }
                s
            }
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => a == b,
            _ => matches!(
                (self, other),
                (Number::Float(a), Number::Float(b)) if a == b
            ),
        }
    }
}

impl From<&JsonNumber> for Number {
    fn from(n: &JsonNumber) -> Self {
        if let Some(i) = n.as_i64() {
            Number::Int(i)
        } else if let Some(u) = n.as_u64() {
            Number::UInt(u)
        } else {
            Number::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl From<Number> for JsonNumber {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => JsonNumber::from(i),
            Number::UInt(u) => JsonNumber::from(u),
            // serde_json::Number::from_f64 returns None for NaN/infinite;
            // those can't legally appear in a parsed JSON document anyway.
            Number::Float(f) => JsonNumber::from_f64(f).unwrap_or_else(|| JsonNumber::from(0)),
        }
    }
}

/// A JSON value: the tree the patch engine reads and mutates.
///
/// `Object` preserves insertion order — this is load-bearing, not cosmetic:
/// wildcard expansion (§4.3) iterates an object's members in this order, and
/// that order must be reproducible across runs for patches to be
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON `null`.
    Null,
    /// JSON `true`/`false`.
    Bool(bool),
    /// A JSON numeric literal.
    Number(Number),
    /// A JSON string.
    String(String),
    /// A JSON array, order-significant.
    Array(Vec<Value>),
    /// A JSON object, insertion-order-significant.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Deep-clones this value.
    ///
    /// `Value` already derives `Clone`; this exists so call sites that are
    /// taking a deep copy for the engine's all-or-nothing semantics can say
    /// so explicitly rather than relying on an anonymous `.clone()`.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        self.clone()
    }

    /// Returns the object member named `key`, if this is an object and it
    /// has one.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(members) => members.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the insertion-order keys of an object, or the `0..len`
    /// indices of an array rendered as decimal strings. Any other variant
    /// contributes no expansion (an empty vector).
    #[must_use]
    pub fn child_keys(&self) -> Vec<String> {
        match self {
            Value::Object(members) => members.iter().map(|(k, _)| k.clone()).collect(),
            Value::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Renders a candidate field to text per §4.2's coercion rules:
    /// booleans as `true`/`false`, numbers in canonical JSON text, strings
    /// verbatim, `null` as `null`; arrays and objects have no text
    /// rendering and always compare as `false` against any comparator.
    #[must_use]
    pub fn coerce_to_text(&self) -> Option<String> {
        match self {
            Value::Null => Some("null".to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_json_text()),
            Value::String(s) => Some(s.clone()),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Deep structural equality: arrays compare order-sensitively, objects
    /// compare by key set and value regardless of member order, numbers
    /// compare exactly (integer and float literals are never equal to each
    /// other even at the same magnitude).
    #[must_use]
    pub fn structural_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structural_eq(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        b.iter()
                            .find(|(bk, _)| bk == k)
                            .is_some_and(|(_, bv)| v.structural_eq(bv))
                    })
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::Value::from(self.clone()))
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(Number::from(n)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                Value::Object(map.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect())
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::from(&v)
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n.into()),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => serde_json::Value::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(members) => serde_json::Value::Object(
                members.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_through_serde_json() {
        let original = json!({"a": 1, "b": [1, 2.5, "x", null, true]});
        let value = Value::from(original.clone());
        let back: serde_json::Value = value.into();
        assert_eq!(original, back);
    }

    #[test]
    fn preserves_insertion_order() {
        let value = Value::from(json!({"c": 1, "a": 2, "b": 3}));
        assert_eq!(value.child_keys(), vec!["c", "a", "b"]);
    }

    #[test]
    fn int_and_float_are_not_structurally_equal() {
        let a = Value::from(json!(1));
        let b = Value::from(json!(1.0));
        assert!(!a.structural_eq(&b));
    }

    #[test]
    fn objects_compare_order_insensitively() {
        let a = Value::from(json!({"a": 1, "b": 2}));
        let b = Value::from(json!({"b": 2, "a": 1}));
        assert!(a.structural_eq(&b));
    }

    #[test]
    fn arrays_compare_order_sensitively() {
        let a = Value::from(json!([1, 2]));
        let b = Value::from(json!([2, 1]));
        assert!(!a.structural_eq(&b));
    }

    #[test]
    fn coerces_scalars_to_text() {
        assert_eq!(Value::Bool(true).coerce_to_text(), Some("true".to_string()));
        assert_eq!(Value::Null.coerce_to_text(), Some("null".to_string()));
        assert_eq!(
            Value::from(json!(42)).coerce_to_text(),
            Some("42".to_string())
        );
        assert_eq!(Value::from(json!([1])).coerce_to_text(), None);
    }
}
