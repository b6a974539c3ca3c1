//! Generated fixture values.
//!
//! `FixtureValue` is the dynamic instance graph produced by the generator.
//! Objects and maps keep insertion order so a fixed seed always yields the
//! same serialized output.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// A generated value of any supported shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureValue {
    /// Absent value
    Null,

    /// Boolean value
    Bool(bool),

    /// Integer value of any width
    Int(i64),

    /// Floating point value of either width
    Float(f64),

    /// Single character
    Char(char),

    /// String value
    String(String),

    /// UUID value
    Uuid(Uuid),

    /// UTC timestamp
    DateTime(DateTime<Utc>),

    /// Enumeration constant
    Enum(String),

    /// Array, list or set elements
    Array(Vec<FixtureValue>),

    /// Key/value pairs in insertion order
    Map(Vec<(FixtureValue, FixtureValue)>),

    /// Composite instance
    Object(FixtureObject),
}

/// Composite instance with fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureObject {
    /// Name of the descriptor the instance was built from
    pub type_name: String,

    /// Field values in declaration order
    pub fields: Vec<(String, FixtureValue)>,
}

impl FixtureObject {
    /// Create an instance with no fields set.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field value.
    pub fn push(&mut self, name: impl Into<String>, value: FixtureValue) {
        self.fields.push((name.into(), value));
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&FixtureValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

impl FixtureValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a timestamp.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Try to get this value as an array.
    pub fn as_array(&self) -> Option<&[FixtureValue]> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to get this value as a map.
    pub fn as_map(&self) -> Option<&[(FixtureValue, FixtureValue)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Try to get this value as an object.
    pub fn as_object(&self) -> Option<&FixtureObject> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Look up a field when this value is an object.
    pub fn field(&self, name: &str) -> Option<&FixtureValue> {
        self.as_object().and_then(|obj| obj.get(name))
    }

    /// Element count for strings, containers and objects.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::Array(arr) => Some(arr.len()),
            Self::Map(entries) => Some(entries.len()),
            Self::Object(obj) => Some(obj.fields.len()),
            _ => None,
        }
    }

    /// Render this value as a map key.
    pub fn key_string(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Char(c) => c.to_string(),
            Self::String(s) | Self::Enum(s) => s.clone(),
            Self::Uuid(u) => u.to_string(),
            Self::DateTime(dt) => dt.to_rfc3339(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }

    /// Convert to a JSON document.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Deserialize into a concrete Rust type.
    pub fn into_typed<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.to_json()?)
    }
}

impl Serialize for FixtureValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Char(c) => serializer.serialize_char(*c),
            Self::String(s) | Self::Enum(s) => serializer.serialize_str(s),
            Self::Uuid(u) => u.serialize(serializer),
            Self::DateTime(dt) => dt.serialize(serializer),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(&key.key_string(), value)?;
                }
                map.end()
            }
            Self::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.fields.len()))?;
                for (name, value) in &obj.fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn sample() -> FixtureValue {
        let mut address = FixtureObject::new("Address");
        address.push("city", FixtureValue::String("Oslo".to_string()));

        let mut user = FixtureObject::new("User");
        user.push("age", FixtureValue::Int(30));
        user.push("active", FixtureValue::Bool(true));
        user.push("status", FixtureValue::Enum("ACTIVE".to_string()));
        user.push(
            "scores",
            FixtureValue::Map(vec![(FixtureValue::Int(1), FixtureValue::Float(0.5))]),
        );
        user.push("address", FixtureValue::Object(address));
        user.push("manager", FixtureValue::Null);
        FixtureValue::Object(user)
    }

    #[test]
    fn test_accessors() {
        let value = sample();
        assert_eq!(value.field("age").and_then(FixtureValue::as_i64), Some(30));
        assert_eq!(value.field("status").and_then(FixtureValue::as_str), Some("ACTIVE"));
        assert!(value.field("manager").unwrap().is_null());
        assert_eq!(value.len(), Some(6));
        assert!(value.field("missing").is_none());
    }

    #[test]
    fn test_json_keeps_field_order_and_stringifies_keys() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"age":30,"active":true,"status":"ACTIVE","scores":{"1":0.5},"address":{"city":"Oslo"},"manager":null}"#
        );
    }

    #[derive(Debug, Deserialize, PartialEq)]
    enum Status {
        #[serde(rename = "ACTIVE")]
        Active,
    }

    #[derive(Debug, Deserialize)]
    struct Address {
        city: String,
    }

    #[derive(Debug, Deserialize)]
    struct User {
        age: u8,
        active: bool,
        status: Status,
        address: Option<Address>,
        manager: Option<Box<User>>,
    }

    #[test]
    fn test_into_typed() {
        let user: User = sample().into_typed().unwrap();
        assert_eq!(user.age, 30);
        assert!(user.active);
        assert_eq!(user.status, Status::Active);
        assert_eq!(user.address.unwrap().city, "Oslo");
        assert!(user.manager.is_none());
    }
}
