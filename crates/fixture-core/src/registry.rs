//! Shared cache of type descriptors.
//!
//! The registry is read concurrently by every generation session. A type is
//! inserted once; later registrations of the same name keep the first
//! descriptor, so concurrent first use never produces two versions.

use crate::descriptor::{Fixture, TypeDescriptor};
use crate::schema::{FixtureSchema, SchemaError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Name-keyed store of composite type descriptors.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    descriptors: DashMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding every type of a schema.
    pub fn from_schema(schema: FixtureSchema) -> Result<Self, SchemaError> {
        let registry = Self::new();
        for descriptor in schema.types {
            let name = descriptor.name.clone();
            if !registry.insert(descriptor) {
                return Err(SchemaError::DuplicateType(name));
            }
        }
        Ok(registry)
    }

    /// Insert a descriptor unless its name is already taken.
    ///
    /// Returns `true` when this call stored the descriptor.
    pub fn insert(&self, descriptor: TypeDescriptor) -> bool {
        match self.descriptors.entry(descriptor.name.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                tracing::debug!(type_name = %descriptor.name, fields = descriptor.fields.len(), "registered type");
                slot.insert(Arc::new(descriptor));
                true
            }
        }
    }

    /// Register a Rust type and, on first registration, its dependencies.
    pub fn register<T: Fixture>(&self) {
        if self.contains(T::type_name()) {
            return;
        }
        if self.insert(T::descriptor()) {
            T::register_dependencies(self);
        }
    }

    /// Get a descriptor by name.
    pub fn get(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.descriptors.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Check if a type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.descriptors.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Find references to composite types that are not registered.
    ///
    /// Returns `(type, field, missing)` triples in type-name order.
    pub fn unresolved_references(&self) -> Vec<(String, String, String)> {
        let mut missing = Vec::new();
        for name in self.type_names() {
            let Some(descriptor) = self.get(&name) else {
                continue;
            };
            for field in &descriptor.fields {
                for referenced in field.field_type.referenced_objects() {
                    if !self.contains(referenced) {
                        missing.push((name.clone(), field.name.clone(), referenced.to_string()));
                    }
                }
            }
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldDescriptor;
    use crate::types::FixtureType;
    use std::thread;

    struct Parent;
    struct Child;

    impl Fixture for Parent {
        fn type_name() -> &'static str {
            "Parent"
        }

        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::new("Parent").field(FieldDescriptor::new(
                "child",
                FixtureType::object("Child"),
            ))
        }

        fn register_dependencies(registry: &TypeRegistry) {
            registry.register::<Child>();
        }
    }

    impl Fixture for Child {
        fn type_name() -> &'static str {
            "Child"
        }

        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::new("Child").field(FieldDescriptor::nullable(
                "parent",
                FixtureType::object("Parent"),
            ))
        }

        fn register_dependencies(registry: &TypeRegistry) {
            registry.register::<Parent>();
        }
    }

    #[test]
    fn test_register_mutual_dependencies() {
        let registry = TypeRegistry::new();
        registry.register::<Parent>();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("Child"));
        assert!(registry.unresolved_references().is_empty());
    }

    #[test]
    fn test_first_insert_wins() {
        let registry = TypeRegistry::new();
        assert!(registry.insert(TypeDescriptor::new("A")));
        assert!(!registry.insert(
            TypeDescriptor::new("A").field(FieldDescriptor::new("x", FixtureType::Int32))
        ));
        assert!(registry.get("A").unwrap().fields.is_empty());
    }

    #[test]
    fn test_concurrent_first_registration() {
        let registry = Arc::new(TypeRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.insert(TypeDescriptor::new("Shared")))
            })
            .collect();

        let stored = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|inserted| *inserted)
            .count();
        assert_eq!(stored, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unresolved_references() {
        let registry = TypeRegistry::new();
        registry.insert(
            TypeDescriptor::new("Cart").field(FieldDescriptor::new(
                "items",
                FixtureType::list(FixtureType::object("Item")),
            )),
        );

        assert_eq!(
            registry.unresolved_references(),
            vec![("Cart".to_string(), "items".to_string(), "Item".to_string())]
        );
    }
}
