//! Type shapes understood by the fixture generator.
//!
//! This module defines `FixtureType`, the closed set of shapes a field can
//! declare. Composite types are referenced by name and resolved through the
//! [`TypeRegistry`](crate::registry::TypeRegistry).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Shape of a field or a top-level generation target.
///
/// # YAML Format
///
/// Simple types can be specified as strings:
/// ```yaml
/// type: int
/// type: string
/// type: uuid
/// ```
///
/// Complex types use object format:
/// ```yaml
/// type:
///   type: list
///   element: string
/// type:
///   type: object
///   name: Address
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureType {
    /// Boolean value
    Bool,

    /// 8-bit signed integer
    Int8,

    /// 16-bit signed integer
    Int16,

    /// 32-bit signed integer
    Int32,

    /// 64-bit signed integer
    Int64,

    /// 32-bit IEEE 754 floating point
    Float32,

    /// 64-bit IEEE 754 floating point
    Float64,

    /// Single character
    Char,

    /// Unbounded text
    String,

    /// UUID (128-bit)
    Uuid,

    /// UTC timestamp
    DateTime,

    /// Enumeration with its declared constants
    Enum {
        /// Constant names in declaration order
        values: Vec<String>,
    },

    /// Fixed-kind sequence (array slot)
    Array {
        /// Element type
        element: Box<FixtureType>,
    },

    /// Growable ordered collection
    List {
        /// Element type
        element: Box<FixtureType>,
    },

    /// Collection of distinct elements
    Set {
        /// Element type
        element: Box<FixtureType>,
    },

    /// Key/value mapping
    Map {
        /// Key type
        key: Box<FixtureType>,
        /// Value type
        value: Box<FixtureType>,
    },

    /// Reference to a composite type registered by name
    Object {
        /// Registered type name
        name: String,
    },

    /// External type with no accessible structure
    Opaque {
        /// Name reported in errors
        name: String,
    },
}

impl FixtureType {
    /// Create a new Enum type with the given constants.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a new Array type with the given element type.
    pub fn array(element: FixtureType) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    /// Create a new List type with the given element type.
    pub fn list(element: FixtureType) -> Self {
        Self::List {
            element: Box::new(element),
        }
    }

    /// Create a new Set type with the given element type.
    pub fn set(element: FixtureType) -> Self {
        Self::Set {
            element: Box::new(element),
        }
    }

    /// Create a new Map type with the given key and value types.
    pub fn map(key: FixtureType, value: FixtureType) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Reference a composite type by name.
    pub fn object(name: impl Into<String>) -> Self {
        Self::Object { name: name.into() }
    }

    /// Declare an external type the generator cannot look into.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self::Opaque { name: name.into() }
    }

    /// Check if this type represents an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Check if this type represents a floating point type.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Check if this type represents a numeric type.
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Check if this type holds multiple elements.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Array { .. } | Self::List { .. } | Self::Set { .. } | Self::Map { .. }
        )
    }

    /// Inclusive representable range for integer types.
    pub fn integer_bounds(&self) -> Option<(i64, i64)> {
        match self {
            Self::Int8 => Some((i8::MIN as i64, i8::MAX as i64)),
            Self::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            Self::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            Self::Int64 => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }

    /// Finite representable range for floating point types.
    pub fn float_bounds(&self) -> Option<(f64, f64)> {
        match self {
            Self::Float32 => Some((f32::MIN as f64, f32::MAX as f64)),
            Self::Float64 => Some((f64::MIN, f64::MAX)),
            _ => None,
        }
    }

    /// Name of the composite type this shape refers to, if any.
    pub fn object_name(&self) -> Option<&str> {
        match self {
            Self::Object { name } => Some(name),
            _ => None,
        }
    }

    /// Every composite type name reachable through this shape.
    pub fn referenced_objects(&self) -> Vec<&str> {
        match self {
            Self::Object { name } => vec![name.as_str()],
            Self::Array { element } | Self::List { element } | Self::Set { element } => {
                element.referenced_objects()
            }
            Self::Map { key, value } => {
                let mut names = key.referenced_objects();
                names.extend(value.referenced_objects());
                names
            }
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for FixtureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int8 => f.write_str("int8"),
            Self::Int16 => f.write_str("int16"),
            Self::Int32 => f.write_str("int32"),
            Self::Int64 => f.write_str("int64"),
            Self::Float32 => f.write_str("float32"),
            Self::Float64 => f.write_str("float64"),
            Self::Char => f.write_str("char"),
            Self::String => f.write_str("string"),
            Self::Uuid => f.write_str("uuid"),
            Self::DateTime => f.write_str("date_time"),
            Self::Enum { values } => write!(f, "enum[{}]", values.join("|")),
            Self::Array { element } => write!(f, "array<{element}>"),
            Self::List { element } => write!(f, "list<{element}>"),
            Self::Set { element } => write!(f, "set<{element}>"),
            Self::Map { key, value } => write!(f, "map<{key}, {value}>"),
            Self::Object { name } | Self::Opaque { name } => f.write_str(name),
        }
    }
}

impl Serialize for FixtureType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            // Simple types - serialize as string
            Self::Bool => serializer.serialize_str("bool"),
            Self::Int8 => serializer.serialize_str("int8"),
            Self::Int16 => serializer.serialize_str("int16"),
            Self::Int32 => serializer.serialize_str("int"),
            Self::Int64 => serializer.serialize_str("long"),
            Self::Float32 => serializer.serialize_str("float"),
            Self::Float64 => serializer.serialize_str("double"),
            Self::Char => serializer.serialize_str("char"),
            Self::String => serializer.serialize_str("string"),
            Self::Uuid => serializer.serialize_str("uuid"),
            Self::DateTime => serializer.serialize_str("date_time"),

            // Complex types - serialize as map
            Self::Enum { values } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "enum")?;
                map.serialize_entry("values", values)?;
                map.end()
            }
            Self::Array { element } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("element", element)?;
                map.end()
            }
            Self::List { element } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "list")?;
                map.serialize_entry("element", element)?;
                map.end()
            }
            Self::Set { element } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "set")?;
                map.serialize_entry("element", element)?;
                map.end()
            }
            Self::Map { key, value } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "map")?;
                map.serialize_entry("key", key)?;
                map.serialize_entry("value", value)?;
                map.end()
            }
            Self::Object { name } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "object")?;
                map.serialize_entry("name", name)?;
                map.end()
            }
            Self::Opaque { name } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "opaque")?;
                map.serialize_entry("name", name)?;
                map.end()
            }
        }
    }
}

fn simple_type(value: &str) -> Option<FixtureType> {
    match value {
        "bool" | "boolean" => Some(FixtureType::Bool),
        "int8" | "byte" => Some(FixtureType::Int8),
        "int16" | "short" => Some(FixtureType::Int16),
        "int" | "int32" | "integer" => Some(FixtureType::Int32),
        "long" | "int64" => Some(FixtureType::Int64),
        "float" | "float32" => Some(FixtureType::Float32),
        "double" | "float64" => Some(FixtureType::Float64),
        "char" => Some(FixtureType::Char),
        "string" | "text" => Some(FixtureType::String),
        "uuid" => Some(FixtureType::Uuid),
        "date_time" | "datetime" | "timestamp" => Some(FixtureType::DateTime),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for FixtureType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct FixtureTypeVisitor;

        impl<'de> Visitor<'de> for FixtureTypeVisitor {
            type Value = FixtureType;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or map representing a FixtureType")
            }

            // Handle string format: "int", "string", etc.
            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                simple_type(value).ok_or_else(|| E::custom(format!("unknown simple type: {value}")))
            }

            // Handle map format: {"type": "list", "element": "int"}
            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut fields: HashMap<String, serde_yaml::Value> = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "type" {
                        type_name = Some(map.next_value()?);
                    } else {
                        fields.insert(key, map.next_value()?);
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;

                if let Some(simple) = simple_type(&type_name) {
                    return Ok(simple);
                }

                match type_name.as_str() {
                    "enum" => {
                        let values = get_field_required(&fields, "values")?;
                        Ok(FixtureType::Enum { values })
                    }
                    "array" => {
                        let element: FixtureType = get_field_required(&fields, "element")?;
                        Ok(FixtureType::array(element))
                    }
                    "list" => {
                        let element: FixtureType = get_field_required(&fields, "element")?;
                        Ok(FixtureType::list(element))
                    }
                    "set" => {
                        let element: FixtureType = get_field_required(&fields, "element")?;
                        Ok(FixtureType::set(element))
                    }
                    "map" => {
                        let key: FixtureType = get_field_required(&fields, "key")?;
                        let value: FixtureType = get_field_required(&fields, "value")?;
                        Ok(FixtureType::map(key, value))
                    }
                    "object" => {
                        let name: String = get_field_required(&fields, "name")?;
                        Ok(FixtureType::Object { name })
                    }
                    "opaque" => {
                        let name: String = get_field_required(&fields, "name")?;
                        Ok(FixtureType::Opaque { name })
                    }
                    _ => Err(M::Error::custom(format!("unknown type: {type_name}"))),
                }
            }
        }

        deserializer.deserialize_any(FixtureTypeVisitor)
    }
}

fn get_field_required<T: for<'de> Deserialize<'de>, E: serde::de::Error>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &'static str,
) -> Result<T, E> {
    let value = fields.get(key).ok_or_else(|| E::missing_field(key))?;
    serde_yaml::from_value(value.clone())
        .map_err(|e| E::custom(format!("invalid field '{key}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_categories() {
        assert!(FixtureType::Int32.is_integer());
        assert!(FixtureType::Float64.is_numeric());
        assert!(!FixtureType::String.is_numeric());
        assert!(FixtureType::list(FixtureType::Int32).is_container());
        assert!(!FixtureType::object("User").is_container());
    }

    #[test]
    fn test_integer_bounds_follow_width() {
        assert_eq!(FixtureType::Int8.integer_bounds(), Some((-128, 127)));
        assert_eq!(
            FixtureType::Int32.integer_bounds(),
            Some((i32::MIN as i64, i32::MAX as i64))
        );
        assert_eq!(FixtureType::String.integer_bounds(), None);
    }

    #[test]
    fn test_deserialize_simple_string() {
        let parsed: FixtureType = serde_yaml::from_str("int").unwrap();
        assert_eq!(parsed, FixtureType::Int32);

        let parsed: FixtureType = serde_yaml::from_str("long").unwrap();
        assert_eq!(parsed, FixtureType::Int64);

        let parsed: FixtureType = serde_yaml::from_str("text").unwrap();
        assert_eq!(parsed, FixtureType::String);

        assert!(serde_yaml::from_str::<FixtureType>("decimal128").is_err());
    }

    #[test]
    fn test_deserialize_complex_types() {
        let yaml = r#"
type: map
key: string
value:
  type: list
  element:
    type: object
    name: Address
"#;
        let parsed: FixtureType = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            parsed,
            FixtureType::map(
                FixtureType::String,
                FixtureType::list(FixtureType::object("Address"))
            )
        );

        let yaml = r#"
type: enum
values: [ACTIVE, LOCKED]
"#;
        let parsed: FixtureType = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed, FixtureType::enumeration(["ACTIVE", "LOCKED"]));
    }

    #[test]
    fn test_missing_required_field() {
        let yaml = r#"
type: list
"#;
        let err = serde_yaml::from_str::<FixtureType>(yaml).unwrap_err();
        assert!(err.to_string().contains("element"));
    }

    #[test]
    fn test_referenced_objects() {
        let ty = FixtureType::map(
            FixtureType::object("Key"),
            FixtureType::set(FixtureType::object("Value")),
        );
        assert_eq!(ty.referenced_objects(), vec!["Key", "Value"]);
        assert!(FixtureType::Int32.referenced_objects().is_empty());
    }

    #[test]
    fn test_serialize_deserialize_nested() {
        let ty = FixtureType::array(FixtureType::map(
            FixtureType::Uuid,
            FixtureType::opaque("Socket"),
        ));
        let yaml = serde_yaml::to_string(&ty).unwrap();
        let parsed: FixtureType = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(ty, parsed);
    }
}
