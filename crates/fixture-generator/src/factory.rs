//! Public entry points for producing fixtures.

use crate::context::InjectType;
use crate::error::{GenerationError, UnsupportedReason};
use crate::random::seed_for_index;
use crate::walker::GraphWalker;
use fixture_core::{
    Fixture, FixtureSchema, FixtureType, FixtureValue, GenerationConfig, SchemaError, TypeRegistry,
};
use serde::de::DeserializeOwned;
use std::sync::{Arc, OnceLock};

/// Walker shared by the free functions, so compiled patterns are reused.
fn shared_walker() -> &'static GraphWalker {
    static WALKER: OnceLock<GraphWalker> = OnceLock::new();
    WALKER.get_or_init(GraphWalker::new)
}

fn create(
    registry: &TypeRegistry,
    type_name: &str,
    mode: InjectType,
    config: Option<&GenerationConfig>,
) -> Result<FixtureValue, GenerationError> {
    let config = config.cloned().unwrap_or_default();
    shared_walker().generate(registry, &FixtureType::object(type_name), mode, config)
}

/// Instance of `type_name` satisfying every declared constraint.
pub fn create_expected(
    registry: &TypeRegistry,
    type_name: &str,
    config: Option<&GenerationConfig>,
) -> Result<FixtureValue, GenerationError> {
    create(registry, type_name, InjectType::Expected, config)
}

/// Instance of `type_name` violating at least one declared constraint.
///
/// Types without any constraint come out as in [`create_expected`].
pub fn create_anti_expected(
    registry: &TypeRegistry,
    type_name: &str,
    config: Option<&GenerationConfig>,
) -> Result<FixtureValue, GenerationError> {
    create(registry, type_name, InjectType::AntiExpected, config)
}

/// Instance of `type_name` with zero leaves and shallow composites.
pub fn create_default_value(
    registry: &TypeRegistry,
    type_name: &str,
    config: Option<&GenerationConfig>,
) -> Result<FixtureValue, GenerationError> {
    create(registry, type_name, InjectType::DefaultValue, config)
}

/// Fixture generator bound to a registry and a default config.
///
/// Cheap to clone; clones share the registry and the pattern cache.
#[derive(Debug, Clone)]
pub struct FixtureFactory {
    registry: Arc<TypeRegistry>,
    walker: Arc<GraphWalker>,
    config: GenerationConfig,
}

impl Default for FixtureFactory {
    fn default() -> Self {
        Self::new(Arc::new(TypeRegistry::new()))
    }
}

impl FixtureFactory {
    /// Create a factory over `registry` with the default config.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            walker: Arc::new(GraphWalker::new()),
            config: GenerationConfig::default(),
        }
    }

    /// Create a factory holding every type of a schema.
    pub fn from_schema(schema: FixtureSchema) -> Result<Self, SchemaError> {
        Ok(Self::new(Arc::new(TypeRegistry::from_schema(schema)?)))
    }

    /// Replace the default config.
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom walker, for example one with extra strategies.
    pub fn with_walker(mut self, walker: GraphWalker) -> Self {
        self.walker = Arc::new(walker);
        self
    }

    /// Descriptor registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Default config used when a call does not pass its own.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate one instance of `type_name` in `mode`.
    pub fn create(&self, type_name: &str, mode: InjectType) -> Result<FixtureValue, GenerationError> {
        self.create_with(type_name, mode, &self.config)
    }

    /// Generate one instance using an explicit config for this call only.
    pub fn create_with(
        &self,
        type_name: &str,
        mode: InjectType,
        config: &GenerationConfig,
    ) -> Result<FixtureValue, GenerationError> {
        self.walker.generate(
            &self.registry,
            &FixtureType::object(type_name),
            mode,
            config.clone(),
        )
    }

    pub fn create_expected(&self, type_name: &str) -> Result<FixtureValue, GenerationError> {
        self.create(type_name, InjectType::Expected)
    }

    pub fn create_anti_expected(&self, type_name: &str) -> Result<FixtureValue, GenerationError> {
        self.create(type_name, InjectType::AntiExpected)
    }

    pub fn create_default_value(&self, type_name: &str) -> Result<FixtureValue, GenerationError> {
        self.create(type_name, InjectType::DefaultValue)
    }

    /// Register `T` and build a valid instance of it.
    pub fn expected<T: Fixture + DeserializeOwned>(&self) -> Result<T, GenerationError> {
        self.registry.register::<T>();
        let value = self.create_expected(T::type_name())?;
        Ok(value.into_typed()?)
    }

    /// Register `T` and build an invalid instance of it.
    ///
    /// Returned untyped: violating values such as a null in a required
    /// field often cannot be represented by `T` itself.
    pub fn anti_expected<T: Fixture>(&self) -> Result<FixtureValue, GenerationError> {
        self.registry.register::<T>();
        self.create_anti_expected(T::type_name())
    }

    /// Register `T` and build its default-value instance.
    pub fn default_value<T: Fixture + DeserializeOwned>(&self) -> Result<T, GenerationError> {
        self.registry.register::<T>();
        let value = self.create_default_value(T::type_name())?;
        Ok(value.into_typed()?)
    }

    /// Lazily generate `count` instances of `type_name`.
    ///
    /// With a configured seed, the instance at each index is reproducible on
    /// its own.
    pub fn batch(
        &self,
        type_name: &str,
        mode: InjectType,
        count: u64,
    ) -> Result<FixtureIterator<'_>, GenerationError> {
        if !self.registry.contains(type_name) {
            return Err(GenerationError::UnsupportedType {
                type_name: type_name.to_string(),
                field: "<root>".to_string(),
                reason: UnsupportedReason::Unregistered,
            });
        }
        Ok(FixtureIterator {
            factory: self,
            type_name: type_name.to_string(),
            mode,
            index: 0,
            end: count,
        })
    }
}

/// Iterator that lazily generates fixtures.
pub struct FixtureIterator<'a> {
    factory: &'a FixtureFactory,
    type_name: String,
    mode: InjectType,
    index: u64,
    end: u64,
}

impl FixtureIterator<'_> {
    /// Skip ahead to `index` without generating the instances before it.
    pub fn with_start_index(mut self, index: u64) -> Self {
        let remaining = self.end - self.index;
        self.index = index;
        self.end = index.saturating_add(remaining);
        self
    }

    /// Index of the next instance.
    pub fn current_index(&self) -> u64 {
        self.index
    }
}

impl Iterator for FixtureIterator<'_> {
    type Item = Result<FixtureValue, GenerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.end {
            return None;
        }
        let index = self.index;
        self.index += 1;

        let mut config = self.factory.config.clone();
        config.seed = config.seed.map(|base| seed_for_index(base, index));
        Some(self.factory.create_with(&self.type_name, self.mode, &config))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FixtureIterator<'_> {}
