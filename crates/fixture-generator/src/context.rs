//! Per-call generation state.

use crate::error::{GenerationError, UnsupportedReason};
use crate::random::RandomSource;
use fixture_core::{ConfigError, ConfigOverrides, FixtureType, GenerationConfig, TypeRegistry};
use rand::rngs::StdRng;
use std::fmt;

/// Generation mode, fixed for a whole top-level call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectType {
    /// Values satisfy every declared constraint
    Expected,
    /// Values violate at least one declared constraint
    AntiExpected,
    /// Zero values, shallow composites
    DefaultValue,
}

impl InjectType {
    /// All modes in declaration order.
    pub const ALL: [InjectType; 3] = [Self::Expected, Self::AntiExpected, Self::DefaultValue];
}

impl fmt::Display for InjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected => f.write_str("expected"),
            Self::AntiExpected => f.write_str("anti_expected"),
            Self::DefaultValue => f.write_str("default_value"),
        }
    }
}

/// State for one top-level generation call.
///
/// Holds the mode, the config stack, the active traversal path (composite
/// type names, index = depth), the field path used in error messages, and
/// the session random source.
pub struct GenerationContext<'r> {
    mode: InjectType,
    registry: &'r TypeRegistry,
    configs: Vec<GenerationConfig>,
    random: RandomSource,
    path: Vec<String>,
    fields: Vec<String>,
}

impl<'r> GenerationContext<'r> {
    /// Create a context for one call.
    pub fn new(registry: &'r TypeRegistry, mode: InjectType, config: GenerationConfig) -> Self {
        let random = RandomSource::new(config.seed);
        Self {
            mode,
            registry,
            configs: vec![config],
            random,
            path: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Active mode.
    pub fn mode(&self) -> InjectType {
        self.mode
    }

    /// Descriptor registry.
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Config in effect for the current scope.
    pub fn config(&self) -> &GenerationConfig {
        // The stack is never emptied below the session config.
        &self.configs[self.configs.len() - 1]
    }

    /// Session random engine.
    pub fn rng(&mut self) -> &mut StdRng {
        self.random.rng()
    }

    /// Config and random engine borrowed together.
    pub fn config_and_rng(&mut self) -> (&GenerationConfig, &mut StdRng) {
        let config = &self.configs[self.configs.len() - 1];
        (config, self.random.rng())
    }

    /// Enter a scope using a config derived from the current one.
    ///
    /// The scope is not entered when the derived config is invalid.
    pub fn push_overrides(&mut self, overrides: &ConfigOverrides) -> Result<(), ConfigError> {
        let derived = self.config().with_overrides(overrides);
        derived.validate()?;
        self.configs.push(derived);
        Ok(())
    }

    /// Leave the innermost override scope.
    pub fn pop_overrides(&mut self) {
        if self.configs.len() > 1 {
            self.configs.pop();
        }
    }

    /// Number of composite types on the active path.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Check if a composite type is being generated further up the path.
    pub fn is_on_path(&self, type_name: &str) -> bool {
        self.path.iter().any(|t| t == type_name)
    }

    /// Check if a composite field of `type_name` must be left null here.
    pub fn should_cut(&self, type_name: &str) -> bool {
        if self.is_on_path(type_name) {
            return true;
        }
        match self.mode {
            InjectType::DefaultValue => self.depth() > self.config().default_value_depth,
            _ => self.depth() >= self.config().max_depth,
        }
    }

    pub(crate) fn enter_type(&mut self, type_name: &str) {
        self.path.push(type_name.to_string());
        if self.fields.is_empty() {
            self.fields.push(type_name.to_string());
        }
    }

    pub(crate) fn exit_type(&mut self) {
        self.path.pop();
    }

    pub(crate) fn enter_field(&mut self, field: &str) {
        self.fields.push(field.to_string());
    }

    pub(crate) fn exit_field(&mut self) {
        self.fields.pop();
    }

    /// Dotted path of the field being generated.
    pub fn field_path(&self) -> String {
        if self.fields.is_empty() {
            "<root>".to_string()
        } else {
            self.fields.join(".")
        }
    }

    /// Build an `UnsupportedType` error for the current field.
    pub fn unsupported(&self, field_type: &FixtureType, reason: UnsupportedReason) -> GenerationError {
        GenerationError::UnsupportedType {
            type_name: field_type.to_string(),
            field: self.field_path(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_scope_restores_parent() {
        let registry = TypeRegistry::new();
        let mut ctx = GenerationContext::new(
            &registry,
            InjectType::Expected,
            GenerationConfig::default(),
        );

        ctx.push_overrides(&ConfigOverrides {
            max_collection_size: Some(1),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ctx.config().max_collection_size, 1);

        ctx.pop_overrides();
        assert_eq!(ctx.config().max_collection_size, 5);

        ctx.pop_overrides();
        assert_eq!(ctx.config().max_collection_size, 5);
    }

    #[test]
    fn test_invalid_override_scope_is_not_entered() {
        let registry = TypeRegistry::new();
        let mut ctx = GenerationContext::new(
            &registry,
            InjectType::Expected,
            GenerationConfig::default(),
        );

        let result = ctx.push_overrides(&ConfigOverrides {
            null_probability: Some(2.0),
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidProbability {
                option: "null_probability",
                ..
            })
        ));
        assert_eq!(ctx.config(), &GenerationConfig::default());
    }

    #[test]
    fn test_cut_on_cycle_and_depth() {
        let registry = TypeRegistry::new();
        let config = GenerationConfig::default().with_max_depth(2);
        let mut ctx = GenerationContext::new(&registry, InjectType::Expected, config);

        ctx.enter_type("A");
        assert!(ctx.should_cut("A"));
        assert!(!ctx.should_cut("B"));

        ctx.enter_type("B");
        assert!(ctx.should_cut("C"));

        ctx.exit_type();
        assert!(!ctx.should_cut("B"));
    }

    #[test]
    fn test_default_value_depth() {
        let registry = TypeRegistry::new();
        let mut ctx = GenerationContext::new(
            &registry,
            InjectType::DefaultValue,
            GenerationConfig::default(),
        );

        ctx.enter_type("Root");
        assert!(!ctx.should_cut("Child"));
        ctx.enter_type("Child");
        assert!(ctx.should_cut("Grandchild"));
    }

    #[test]
    fn test_field_path() {
        let registry = TypeRegistry::new();
        let mut ctx = GenerationContext::new(
            &registry,
            InjectType::Expected,
            GenerationConfig::default(),
        );
        assert_eq!(ctx.field_path(), "<root>");

        ctx.enter_type("User");
        ctx.enter_field("address");
        ctx.enter_type("Address");
        ctx.enter_field("city");
        assert_eq!(ctx.field_path(), "User.address.city");

        let err = ctx.unsupported(&FixtureType::opaque("Socket"), UnsupportedReason::Opaque);
        assert!(err.to_string().contains("User.address.city"));
    }
}
