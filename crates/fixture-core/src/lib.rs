//! Core types for the fixture-forge generator.
//!
//! This crate provides the data model shared by the generator and its
//! callers:
//!
//! - [`FixtureType`] - Shapes a field can declare
//! - [`Constraint`] - Declarative field rules read by the generator
//! - [`TypeDescriptor`] / [`FieldDescriptor`] - Reflected composite types
//! - [`Fixture`] - How a Rust type describes itself
//! - [`FixtureSchema`] - Type descriptors loaded from YAML
//! - [`TypeRegistry`] - Shared descriptor cache
//! - [`FixtureValue`] - Generated instances
//! - [`GenerationConfig`] - Generation parameters
//!
//! # Architecture
//!
//! ```text
//! fixture-core (this crate)
//!    │
//!    ├─── fixture-generator  (walks descriptors, produces FixtureValue)
//!    │
//!    └─── fixture-forge      (CLI over YAML schemas)
//! ```

pub mod config;
pub mod constraint;
pub mod descriptor;
pub mod registry;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use config::{ConfigError, ConfigOverrides, GenerationConfig};
pub use constraint::{Constraint, StringFormat};
pub use descriptor::{FieldDescriptor, Fixture, TypeDescriptor};
pub use registry::TypeRegistry;
pub use schema::{FixtureSchema, SchemaError};
pub use types::FixtureType;
pub use values::{FixtureObject, FixtureValue};
