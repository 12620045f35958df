//! # Claim Model
//!
//! An ordered set of named claims, the input to commitment building.
//! Claim values are a tagged variant — integer, text, or a nested claim
//! set — dispatched by exhaustive `match` everywhere, never by runtime
//! type inspection.
//!
//! ## Security Invariant
//!
//! Declaration order is semantic: each claim's key index is its position
//! in the set, so reordering claims changes every downstream key. The
//! `Deserialize` impl reads map entries in document order (it does not go
//! through a sorted intermediate map), and `Serialize` writes them back
//! in the same order.
//!
//! Claim sets are trees by construction — values are owned, so cyclic or
//! self-referential structures cannot be expressed.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CommitmentError;

/// A single claim value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimValue {
    /// A non-negative integer, embedded directly as a field element.
    Int(u64),
    /// A UTF-8 string, hashed into the field during encoding.
    Text(String),
    /// A nested claim group, committed as its own sub-tree.
    Nested(ClaimSet),
}

/// An ordered mapping from claim name to claim value.
///
/// Insertion order assigns each claim its key index `0, 1, 2, …`,
/// independent of value type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClaimSet {
    entries: Vec<(String, ClaimValue)>,
}

impl ClaimSet {
    /// Create an empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a claim. Fails with `DuplicateKey` if the name is taken.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: ClaimValue,
    ) -> Result<(), CommitmentError> {
        let name = name.into();
        if self.entries.iter().any(|(n, _)| *n == name) {
            return Err(CommitmentError::DuplicateKey(name));
        }
        self.entries.push((name, value));
        Ok(())
    }

    /// Look up a claim by name.
    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Iterate claims in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClaimValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of claims in this set (not counting nested members).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the set holds no claims.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a claim set from a JSON object, preserving declaration order.
    ///
    /// Accepts non-negative integers, strings, and nested objects.
    /// Floats, negative numbers, booleans, nulls, and arrays have no
    /// canonical field encoding and fail with `ValueOutOfRange`.
    pub fn from_json(json: &str) -> Result<Self, CommitmentError> {
        serde_json::from_str(json)
            .map_err(|e| CommitmentError::ValueOutOfRange(format!("invalid claim document: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Serde — order-preserving, restricted value domain
// ---------------------------------------------------------------------------

impl Serialize for ClaimValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ClaimValue::Int(v) => serializer.serialize_u64(*v),
            ClaimValue::Text(s) => serializer.serialize_str(s),
            ClaimValue::Nested(set) => set.serialize(serializer),
        }
    }
}

impl Serialize for ClaimSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct ClaimValueVisitor;

impl<'de> Visitor<'de> for ClaimValueVisitor {
    type Value = ClaimValue;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a non-negative integer, a string, or a nested claim object")
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<ClaimValue, E> {
        Ok(ClaimValue::Int(v))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<ClaimValue, E> {
        u64::try_from(v)
            .map(ClaimValue::Int)
            .map_err(|_| E::custom(format!("negative claim value {v} has no field encoding")))
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<ClaimValue, E> {
        Err(E::custom(format!(
            "float claim value {v} has no canonical field encoding"
        )))
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<ClaimValue, E> {
        Ok(ClaimValue::Text(v.to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<ClaimValue, A::Error> {
        ClaimSetVisitor.visit_map(map).map(ClaimValue::Nested)
    }
}

impl<'de> Deserialize<'de> for ClaimValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ClaimValueVisitor)
    }
}

struct ClaimSetVisitor;

impl<'de> Visitor<'de> for ClaimSetVisitor {
    type Value = ClaimSet;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a JSON object of claims")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ClaimSet, A::Error> {
        let mut set = ClaimSet::new();
        while let Some((name, value)) = map.next_entry::<String, ClaimValue>()? {
            set.insert(name, value).map_err(serde::de::Error::custom)?;
        }
        Ok(set)
    }
}

impl<'de> Deserialize<'de> for ClaimSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ClaimSetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClaimSet {
        let mut set = ClaimSet::new();
        set.insert("name", ClaimValue::Text("ham".to_string())).unwrap();
        set.insert("age", ClaimValue::Int(25)).unwrap();
        let mut org = ClaimSet::new();
        org.insert("id", ClaimValue::Text("did:example:c34f".to_string()))
            .unwrap();
        org.insert("department", ClaimValue::Text("infosec".to_string()))
            .unwrap();
        set.insert("alumniOf", ClaimValue::Nested(org)).unwrap();
        set
    }

    #[test]
    fn insertion_order_is_preserved() {
        let set = sample();
        let names: Vec<&str> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "age", "alumniOf"]);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut set = ClaimSet::new();
        set.insert("a", ClaimValue::Int(1)).unwrap();
        let err = set.insert("a", ClaimValue::Int(2)).unwrap_err();
        assert!(matches!(err, CommitmentError::DuplicateKey(_)));
        // First value untouched.
        assert_eq!(set.get("a"), Some(&ClaimValue::Int(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn from_json_preserves_document_order() {
        let set = ClaimSet::from_json(r#"{"z": 1, "a": "two", "m": {"k": 3}}"#).unwrap();
        let names: Vec<&str> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(set.get("z"), Some(&ClaimValue::Int(1)));
        match set.get("m") {
            Some(ClaimValue::Nested(inner)) => {
                assert_eq!(inner.get("k"), Some(&ClaimValue::Int(3)));
            }
            other => panic!("expected nested claim set, got {other:?}"),
        }
    }

    #[test]
    fn from_json_rejects_floats_and_negatives() {
        assert!(ClaimSet::from_json(r#"{"a": 1.5}"#).is_err());
        assert!(ClaimSet::from_json(r#"{"a": -3}"#).is_err());
    }

    #[test]
    fn from_json_rejects_bool_null_and_arrays() {
        assert!(ClaimSet::from_json(r#"{"a": true}"#).is_err());
        assert!(ClaimSet::from_json(r#"{"a": null}"#).is_err());
        assert!(ClaimSet::from_json(r#"{"a": [1, 2]}"#).is_err());
    }

    #[test]
    fn from_json_rejects_duplicate_names() {
        assert!(ClaimSet::from_json(r#"{"a": 1, "a": 2}"#).is_err());
    }

    #[test]
    fn json_roundtrip_keeps_order_and_values() {
        let set = sample();
        let json = serde_json::to_string(&set).unwrap();
        // Serialized object starts with the first-declared claim.
        assert!(json.starts_with(r#"{"name""#));
        let back = ClaimSet::from_json(&json).unwrap();
        assert_eq!(set, back);
    }
}
