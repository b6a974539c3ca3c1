//! Composite type descriptors.
//!
//! A `TypeDescriptor` is the reflected shape of one composite type: its name
//! and its fields in declaration order. Rust types describe themselves by
//! implementing [`Fixture`]; externally defined types come from a YAML
//! [`FixtureSchema`](crate::schema::FixtureSchema).

use crate::config::ConfigOverrides;
use crate::constraint::{Constraint, StringFormat};
use crate::registry::TypeRegistry;
use crate::types::FixtureType;
use serde::{Deserialize, Serialize};

/// One declared field of a composite type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,

    /// Declared type
    #[serde(rename = "type")]
    pub field_type: FixtureType,

    /// Whether the slot accepts null
    #[serde(default)]
    pub nullable: bool,

    /// Declared constraints, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,

    /// Specialised string shape
    #[serde(default)]
    pub format: StringFormat,

    /// Config overrides applied to this field's subtree
    #[serde(default, skip_serializing_if = "ConfigOverrides::is_empty")]
    pub overrides: ConfigOverrides,
}

impl FieldDescriptor {
    /// Create a new non-nullable field without constraints.
    pub fn new(name: impl Into<String>, field_type: FixtureType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: false,
            constraints: Vec::new(),
            format: StringFormat::Plain,
            overrides: ConfigOverrides::default(),
        }
    }

    /// Create a new nullable field without constraints.
    pub fn nullable(name: impl Into<String>, field_type: FixtureType) -> Self {
        Self {
            nullable: true,
            ..Self::new(name, field_type)
        }
    }

    /// Add a constraint.
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Tag the field with a string format.
    pub fn with_format(mut self, format: StringFormat) -> Self {
        self.format = format;
        self
    }

    /// Attach config overrides for this field's subtree.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Check if the field declares any constraint.
    pub fn is_constrained(&self) -> bool {
        !self.constraints.is_empty() || self.format != StringFormat::Plain
    }
}

/// Reflected shape of a composite type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type name, unique within a registry
    pub name: String,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    /// Create a descriptor with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get all field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Composite type names referenced by any field.
    pub fn referenced_objects(&self) -> Vec<&str> {
        self.fields
            .iter()
            .flat_map(|f| f.field_type.referenced_objects())
            .collect()
    }
}

/// A Rust type that can describe its own shape to the generator.
///
/// `register_dependencies` must register every composite type the
/// descriptor references. Registration is idempotent, so mutually
/// referencing types may register each other.
///
/// ```rust
/// use fixture_core::{Constraint, FieldDescriptor, Fixture, FixtureType, TypeDescriptor, TypeRegistry};
///
/// struct Person;
///
/// impl Fixture for Person {
///     fn type_name() -> &'static str {
///         "Person"
///     }
///
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::new("Person").field(
///             FieldDescriptor::new("age", FixtureType::Int32)
///                 .with(Constraint::Min { value: 1 })
///                 .with(Constraint::Max { value: 100 }),
///         )
///     }
/// }
///
/// let registry = TypeRegistry::new();
/// registry.register::<Person>();
/// assert!(registry.contains("Person"));
/// ```
pub trait Fixture {
    /// Registered name of the type.
    fn type_name() -> &'static str;

    /// Field layout and constraints.
    fn descriptor() -> TypeDescriptor;

    /// Register composite types referenced by [`Fixture::descriptor`].
    fn register_dependencies(_registry: &TypeRegistry) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builders() {
        let field = FieldDescriptor::nullable("email", FixtureType::String)
            .with(Constraint::NotBlank)
            .with_format(StringFormat::Email);

        assert!(field.nullable);
        assert!(field.is_constrained());
        assert_eq!(field.constraints, vec![Constraint::NotBlank]);
        assert!(!FieldDescriptor::new("id", FixtureType::Uuid).is_constrained());
    }

    #[test]
    fn test_descriptor_lookup() {
        let descriptor = TypeDescriptor::new("Order")
            .field(FieldDescriptor::new("id", FixtureType::Int64))
            .field(FieldDescriptor::new(
                "lines",
                FixtureType::list(FixtureType::object("OrderLine")),
            ))
            .field(FieldDescriptor::nullable(
                "customer",
                FixtureType::object("Customer"),
            ));

        assert_eq!(descriptor.field_names(), vec!["id", "lines", "customer"]);
        assert_eq!(
            descriptor.get_field("id").map(|f| &f.field_type),
            Some(&FixtureType::Int64)
        );
        assert!(descriptor.get_field("missing").is_none());
        assert_eq!(descriptor.referenced_objects(), vec!["OrderLine", "Customer"]);
    }

    #[test]
    fn test_field_yaml() {
        let yaml = r#"
name: contact
type: string
nullable: true
format: email
overrides:
  string_max_length: 40
constraints:
  - kind: not_null
"#;
        let field: FieldDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(field.format, StringFormat::Email);
        assert_eq!(field.overrides.string_max_length, Some(40));
        assert_eq!(field.constraints, vec![Constraint::NotNull]);
    }
}
