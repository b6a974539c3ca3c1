//! Type capabilities and the strategy table.
//!
//! A capability classifies a `FixtureType` for strategy dispatch. The
//! [`CapabilityRegistry`] maps `(mode, capability)` to the strategy that
//! produces values, resolved at lookup time.

use crate::context::InjectType;
use crate::error::UnsupportedReason;
use crate::generators::array::{CollectionStrategy, MapStrategy};
use crate::generators::boolean::BooleanStrategy;
use crate::generators::composite::CompositeStrategy;
use crate::generators::enumeration::EnumStrategy;
use crate::generators::numeric::{FloatStrategy, IntegerStrategy};
use crate::generators::text::{CharStrategy, TextStrategy};
use crate::generators::timestamp::DateTimeStrategy;
use crate::generators::uuid::UuidStrategy;
use crate::generators::zero::ZeroValueStrategy;
use crate::generators::ValueStrategy;
use fixture_core::{FixtureType, TypeRegistry};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Classification of a type used to select its strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Boolean,
    Integer,
    Float,
    Char,
    Text,
    Uuid,
    DateTime,
    Enumeration,
    Collection,
    Map,
    Array,
    Composite,
}

impl Capability {
    /// Leaf capabilities produce a value without recursing.
    pub fn is_leaf(&self) -> bool {
        !matches!(
            self,
            Self::Collection | Self::Map | Self::Array | Self::Composite
        )
    }

    /// Capabilities whose values have a length.
    pub fn is_sized(&self) -> bool {
        matches!(self, Self::Text | Self::Collection | Self::Map | Self::Array)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

type Matcher = fn(&FixtureType) -> Option<Capability>;

fn match_primitive(ty: &FixtureType) -> Option<Capability> {
    match ty {
        FixtureType::Bool => Some(Capability::Boolean),
        FixtureType::Int8 | FixtureType::Int16 | FixtureType::Int32 | FixtureType::Int64 => {
            Some(Capability::Integer)
        }
        FixtureType::Float32 | FixtureType::Float64 => Some(Capability::Float),
        FixtureType::Char => Some(Capability::Char),
        FixtureType::String => Some(Capability::Text),
        FixtureType::Uuid => Some(Capability::Uuid),
        FixtureType::DateTime => Some(Capability::DateTime),
        _ => None,
    }
}

fn match_enum(ty: &FixtureType) -> Option<Capability> {
    matches!(ty, FixtureType::Enum { .. }).then_some(Capability::Enumeration)
}

fn match_collection(ty: &FixtureType) -> Option<Capability> {
    match ty {
        FixtureType::List { .. } | FixtureType::Set { .. } => Some(Capability::Collection),
        FixtureType::Map { .. } => Some(Capability::Map),
        _ => None,
    }
}

fn match_array(ty: &FixtureType) -> Option<Capability> {
    matches!(ty, FixtureType::Array { .. }).then_some(Capability::Array)
}

/// Matchers tried before the composite fallback, in order.
const RESOLUTION_ORDER: [Matcher; 4] = [match_primitive, match_enum, match_collection, match_array];

/// Classify a type.
///
/// Object references fall back to `Composite` when the registry knows the
/// name; opaque and unknown types are unsupported.
pub fn resolve(ty: &FixtureType, registry: &TypeRegistry) -> Result<Capability, UnsupportedReason> {
    if let Some(capability) = RESOLUTION_ORDER.iter().find_map(|matcher| matcher(ty)) {
        return Ok(capability);
    }
    match ty {
        FixtureType::Object { name } if registry.contains(name) => Ok(Capability::Composite),
        FixtureType::Object { .. } => Err(UnsupportedReason::Unregistered),
        _ => Err(UnsupportedReason::Opaque),
    }
}

/// Strategy table keyed by mode and capability.
#[derive(Clone)]
pub struct CapabilityRegistry {
    strategies: HashMap<(InjectType, Capability), Arc<dyn ValueStrategy>>,
}

impl CapabilityRegistry {
    /// Create an empty table.
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Table with the built-in strategies.
    ///
    /// Expected and anti-expected modes share strategies; the directive
    /// carries the polarity. Default-value mode maps every leaf to the zero
    /// strategy.
    pub fn standard() -> Self {
        let constrained: [(Capability, Arc<dyn ValueStrategy>); 12] = [
            (Capability::Boolean, Arc::new(BooleanStrategy)),
            (Capability::Integer, Arc::new(IntegerStrategy)),
            (Capability::Float, Arc::new(FloatStrategy)),
            (Capability::Char, Arc::new(CharStrategy)),
            (Capability::Text, Arc::new(TextStrategy)),
            (Capability::Uuid, Arc::new(UuidStrategy)),
            (Capability::DateTime, Arc::new(DateTimeStrategy)),
            (Capability::Enumeration, Arc::new(EnumStrategy)),
            (Capability::Collection, Arc::new(CollectionStrategy)),
            (Capability::Map, Arc::new(MapStrategy)),
            (Capability::Array, Arc::new(CollectionStrategy)),
            (Capability::Composite, Arc::new(CompositeStrategy)),
        ];

        let mut registry = Self::empty();
        let zero: Arc<dyn ValueStrategy> = Arc::new(ZeroValueStrategy);
        for (capability, strategy) in constrained {
            registry = registry
                .with_strategy(InjectType::Expected, capability, Arc::clone(&strategy))
                .with_strategy(InjectType::AntiExpected, capability, Arc::clone(&strategy));
            let default_strategy = if capability == Capability::Composite {
                strategy
            } else {
                Arc::clone(&zero)
            };
            registry = registry.with_strategy(InjectType::DefaultValue, capability, default_strategy);
        }
        registry
    }

    /// Register or replace the strategy for a mode and capability.
    pub fn with_strategy(
        mut self,
        mode: InjectType,
        capability: Capability,
        strategy: Arc<dyn ValueStrategy>,
    ) -> Self {
        self.strategies.insert((mode, capability), strategy);
        self
    }

    /// Strategy for a mode and capability.
    pub fn lookup(&self, mode: InjectType, capability: Capability) -> Option<Arc<dyn ValueStrategy>> {
        self.strategies.get(&(mode, capability)).map(Arc::clone)
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("strategies", &self.strategies.len())
            .finish()
    }
}
