//! Generation errors.

use crate::generators::pattern::PatternError;
use fixture_core::ConfigError;

/// Error type for generator operations.
///
/// Any error aborts the whole top-level call; no partial instance is
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// No strategy can produce a value for the type
    #[error("Unsupported type '{type_name}' at '{field}': {reason}")]
    UnsupportedType {
        type_name: String,
        field: String,
        reason: UnsupportedReason,
    },

    /// A pattern constraint does not compile
    #[error("Invalid pattern '{pattern}' at '{field}': {source}")]
    InvalidPattern {
        field: String,
        pattern: String,
        #[source]
        source: PatternError,
    },

    /// Config rejected before generation started
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    /// Generated value does not fit the requested Rust type
    #[error("Failed to convert fixture: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Why a type could not be generated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedReason {
    /// External type without accessible structure
    #[error("opaque type has no accessible fields")]
    Opaque,

    /// Object reference missing from the registry
    #[error("type is not registered")]
    Unregistered,

    /// Strategy table has no entry for the capability in this mode
    #[error("no strategy for capability '{0}'")]
    MissingStrategy(String),

    /// Violation search gave up
    #[error("no violating value found after {attempts} attempts")]
    RetryExhausted { attempts: u32 },

    /// Pattern could not be satisfied
    #[error("no matching value found after {attempts} attempts")]
    PatternUnsatisfied { attempts: u32 },
}
