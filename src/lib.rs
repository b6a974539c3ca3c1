//! fixture-forge
//!
//! Schema-driven front end over the fixture generator.
//!
//! # CLI Usage
//!
//! ```bash
//! # Ten valid users, reproducible
//! fixture-forge generate --schema types.yaml --type User --count 10 --seed 42
//!
//! # One invalid user, pretty printed
//! fixture-forge generate --schema types.yaml --type User --mode anti-expected --pretty
//!
//! # Validate a schema before using it
//! fixture-forge check --schema types.yaml
//! ```

use anyhow::Context;
use clap::ValueEnum;
use fixture_core::{Constraint, FixtureSchema, GenerationConfig, TypeRegistry};
use fixture_generator::{CompiledPattern, FixtureFactory, InjectType};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub use fixture_core;
pub use fixture_generator;

/// Generation mode as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Expected,
    AntiExpected,
    DefaultValue,
}

impl From<Mode> for InjectType {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Expected => InjectType::Expected,
            Mode::AntiExpected => InjectType::AntiExpected,
            Mode::DefaultValue => InjectType::DefaultValue,
        }
    }
}

/// A problem found in a schema by [`check_schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum SchemaIssue {
    /// A field refers to an object type the schema does not define
    UnknownReference {
        type_name: String,
        field: String,
        reference: String,
    },
    /// A pattern constraint does not compile
    InvalidPattern {
        type_name: String,
        field: String,
        pattern: String,
        message: String,
    },
    /// Field config overrides that can never form a valid config
    InvalidOverrides {
        type_name: String,
        field: String,
        message: String,
    },
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownReference {
                type_name,
                field,
                reference,
            } => write!(f, "{type_name}.{field}: unknown type '{reference}'"),
            Self::InvalidPattern {
                type_name,
                field,
                pattern,
                message,
            } => write!(f, "{type_name}.{field}: invalid pattern '{pattern}': {message}"),
            Self::InvalidOverrides {
                type_name,
                field,
                message,
            } => write!(f, "{type_name}.{field}: invalid overrides: {message}"),
        }
    }
}

/// List every unresolved reference, uncompilable pattern and invalid
/// field override in a schema.
///
/// Duplicate type names are a hard error rather than an issue.
pub fn check_schema(schema: FixtureSchema) -> anyhow::Result<Vec<SchemaIssue>> {
    let mut issues = Vec::new();
    for descriptor in &schema.types {
        for field in &descriptor.fields {
            if let Err(e) = field.overrides.validate() {
                issues.push(SchemaIssue::InvalidOverrides {
                    type_name: descriptor.name.clone(),
                    field: field.name.clone(),
                    message: e.to_string(),
                });
            }
            for constraint in &field.constraints {
                let Constraint::Pattern { regexp } = constraint else {
                    continue;
                };
                if let Err(e) = CompiledPattern::compile(regexp) {
                    issues.push(SchemaIssue::InvalidPattern {
                        type_name: descriptor.name.clone(),
                        field: field.name.clone(),
                        pattern: regexp.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    let registry = TypeRegistry::from_schema(schema).context("Failed to register schema types")?;
    issues.extend(
        registry
            .unresolved_references()
            .into_iter()
            .map(|(type_name, field, reference)| SchemaIssue::UnknownReference {
                type_name,
                field,
                reference,
            }),
    );
    Ok(issues)
}

/// Load the generation config, falling back to defaults when no file is given.
pub fn load_config(path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<GenerationConfig> {
    let config = match path {
        Some(path) => GenerationConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {path:?}"))?,
        None => GenerationConfig::default(),
    };
    let config = match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    };
    config.validate().context("Invalid generation config")?;
    Ok(config)
}

/// Generate `count` fixtures of `type_name` as JSON documents.
pub fn generate_documents(
    schema: FixtureSchema,
    type_name: &str,
    mode: Mode,
    count: u64,
    config: GenerationConfig,
) -> anyhow::Result<Vec<serde_json::Value>> {
    let registry = TypeRegistry::from_schema(schema).context("Failed to register schema types")?;
    let factory = FixtureFactory::new(Arc::new(registry)).with_config(config);

    tracing::info!(
        "Generating {} {} fixture(s) of type {}",
        count,
        InjectType::from(mode),
        type_name
    );

    factory
        .batch(type_name, mode.into(), count)
        .with_context(|| format!("Cannot generate type '{type_name}'"))?
        .enumerate()
        .map(|(index, fixture)| {
            let fixture =
                fixture.with_context(|| format!("Failed to generate fixture #{index}"))?;
            fixture
                .to_json()
                .with_context(|| format!("Failed to encode fixture #{index}"))
        })
        .collect()
}
