//! Constrained-random fixture generator.
//!
//! This crate walks registered type descriptors and produces instances in
//! one of three modes:
//!
//! - `Expected` - every declared constraint holds
//! - `AntiExpected` - at least one declared constraint is broken
//! - `DefaultValue` - zero leaves, composites null past a shallow depth
//!
//! # Architecture
//!
//! ```text
//! TypeRegistry (descriptors)
//!        │
//!        ▼
//! ┌──────────────────────┐      ┌───────────────────────┐
//! │     GraphWalker      │─────▶│ ConstraintInterpreter │
//! │                      │      └───────────────────────┘
//! │  GenerationContext   │                 │ ConstraintDirective
//! │  - mode, config      │                 ▼
//! │  - path (cycles)     │      ┌───────────────────────┐
//! │  - RandomSource      │─────▶│  CapabilityRegistry   │
//! └──────────────────────┘      │  (mode, capability)   │
//!        ▲                      │   -> ValueStrategy    │
//!        └──────────────────────┴───────────────────────┘
//!                 containers and composites recurse
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{Constraint, FieldDescriptor, FixtureType, GenerationConfig, TypeDescriptor, TypeRegistry};
//! use fixture_generator::{create_anti_expected, create_expected};
//!
//! let registry = TypeRegistry::new();
//! registry.insert(
//!     TypeDescriptor::new("Person").field(
//!         FieldDescriptor::new("age", FixtureType::Int32)
//!             .with(Constraint::Min { value: 1 })
//!             .with(Constraint::Max { value: 100 }),
//!     ),
//! );
//!
//! let config = GenerationConfig::default().with_seed(42);
//! let valid = create_expected(&registry, "Person", Some(&config)).unwrap();
//! let age = valid.field("age").and_then(|v| v.as_i64()).unwrap();
//! assert!((1..=100).contains(&age));
//!
//! let invalid = create_anti_expected(&registry, "Person", Some(&config)).unwrap();
//! let age = invalid.field("age").and_then(|v| v.as_i64()).unwrap();
//! assert!(!(1..=100).contains(&age));
//! ```

pub mod capability;
pub mod context;
pub mod directive;
pub mod error;
pub mod factory;
pub mod generators;
pub mod interpreter;
pub mod random;
pub mod walker;

// Re-exports for convenience
pub use capability::{Capability, CapabilityRegistry};
pub use context::{GenerationContext, InjectType};
pub use directive::{ConstraintDirective, Polarity, Presence, Violation};
pub use error::{GenerationError, UnsupportedReason};
pub use factory::{
    create_anti_expected, create_default_value, create_expected, FixtureFactory, FixtureIterator,
};
pub use generators::pattern::{CompiledPattern, PatternError};
pub use generators::{ValueRequest, ValueStrategy};
pub use interpreter::ConstraintInterpreter;
pub use random::{seed_for_index, RandomSource};
pub use walker::GraphWalker;
