//! Generation parameters.
//!
//! `GenerationConfig` is a plain value. Nested scopes never mutate the
//! caller's config; they derive a new one with [`GenerationConfig::with_overrides`]
//! or the `with_*` builders.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading a config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML config: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Error parsing TOML
    #[error("Failed to parse TOML config: {0}")]
    TomlError(#[from] toml::de::Error),

    /// A probability outside [0, 1]
    #[error("Option '{option}' must be within [0.0, 1.0], got {value}")]
    InvalidProbability { option: &'static str, value: f64 },

    /// A lower bound above its upper bound
    #[error("Option '{min_option}' ({min}) exceeds '{max_option}' ({max})")]
    InvertedBounds {
        min_option: &'static str,
        min: usize,
        max_option: &'static str,
        max: usize,
    },
}

fn default_min_collection_size() -> usize {
    1
}

fn default_max_collection_size() -> usize {
    5
}

fn default_boolean_true_probability() -> f64 {
    0.5
}

fn default_string_min_length() -> usize {
    1
}

fn default_string_max_length() -> usize {
    16
}

fn default_max_depth() -> usize {
    4
}

fn default_default_value_depth() -> usize {
    1
}

fn default_retry_limit() -> u32 {
    16
}

/// Options steering value generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Chance that a nullable, unconstrained field is left null
    #[serde(default)]
    pub null_probability: f64,

    /// Lower bound for generated collection sizes
    #[serde(default = "default_min_collection_size")]
    pub min_collection_size: usize,

    /// Upper bound for generated collection sizes
    #[serde(default = "default_max_collection_size")]
    pub max_collection_size: usize,

    /// Bias for unconstrained boolean fields
    #[serde(default = "default_boolean_true_probability")]
    pub boolean_true_probability: f64,

    /// Lower bound for generated string lengths
    #[serde(default = "default_string_min_length")]
    pub string_min_length: usize,

    /// Upper bound for generated string lengths
    #[serde(default = "default_string_max_length")]
    pub string_max_length: usize,

    /// Composite nesting depth after which fields are left null
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Composite nesting depth populated in default-value mode
    #[serde(default = "default_default_value_depth")]
    pub default_value_depth: usize,

    /// Attempts allowed when searching for a constraint-violating value
    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,

    /// Seed for the session random source; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            null_probability: 0.0,
            min_collection_size: default_min_collection_size(),
            max_collection_size: default_max_collection_size(),
            boolean_true_probability: default_boolean_true_probability(),
            string_min_length: default_string_min_length(),
            string_max_length: default_string_max_length(),
            max_depth: default_max_depth(),
            default_value_depth: default_default_value_depth(),
            retry_limit: default_retry_limit(),
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Load config from a YAML or TOML file, chosen by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: GenerationConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: GenerationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check probabilities and paired bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("null_probability", self.null_probability)?;
        check_probability("boolean_true_probability", self.boolean_true_probability)?;
        check_bounds(
            ("min_collection_size", self.min_collection_size),
            ("max_collection_size", self.max_collection_size),
        )?;
        check_bounds(
            ("string_min_length", self.string_min_length),
            ("string_max_length", self.string_max_length),
        )
    }

    /// Derive a config with the given overrides applied.
    ///
    /// The result is not validated; scoped overrides may only form a
    /// consistent config once combined with what they inherit.
    pub fn with_overrides(&self, overrides: &ConfigOverrides) -> Self {
        Self {
            null_probability: overrides.null_probability.unwrap_or(self.null_probability),
            min_collection_size: overrides
                .min_collection_size
                .unwrap_or(self.min_collection_size),
            max_collection_size: overrides
                .max_collection_size
                .unwrap_or(self.max_collection_size),
            boolean_true_probability: overrides
                .boolean_true_probability
                .unwrap_or(self.boolean_true_probability),
            string_min_length: overrides.string_min_length.unwrap_or(self.string_min_length),
            string_max_length: overrides.string_max_length.unwrap_or(self.string_max_length),
            max_depth: overrides.max_depth.unwrap_or(self.max_depth),
            default_value_depth: overrides
                .default_value_depth
                .unwrap_or(self.default_value_depth),
            retry_limit: self.retry_limit,
            seed: self.seed,
        }
    }

    pub fn with_null_probability(&self, value: f64) -> Self {
        Self {
            null_probability: value,
            ..self.clone()
        }
    }

    pub fn with_collection_size(&self, min: usize, max: usize) -> Self {
        Self {
            min_collection_size: min,
            max_collection_size: max,
            ..self.clone()
        }
    }

    pub fn with_boolean_true_probability(&self, value: f64) -> Self {
        Self {
            boolean_true_probability: value,
            ..self.clone()
        }
    }

    pub fn with_string_length(&self, min: usize, max: usize) -> Self {
        Self {
            string_min_length: min,
            string_max_length: max,
            ..self.clone()
        }
    }

    pub fn with_max_depth(&self, value: usize) -> Self {
        Self {
            max_depth: value,
            ..self.clone()
        }
    }

    pub fn with_default_value_depth(&self, value: usize) -> Self {
        Self {
            default_value_depth: value,
            ..self.clone()
        }
    }

    pub fn with_retry_limit(&self, value: u32) -> Self {
        Self {
            retry_limit: value,
            ..self.clone()
        }
    }

    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self.clone()
        }
    }
}

/// Partial config applied on top of an inherited one.
///
/// Session-wide settings (`seed`, `retry_limit`) cannot be overridden per scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_collection_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_collection_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_true_probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value_depth: Option<usize>,
}

impl ConfigOverrides {
    /// Check if no option is overridden.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check the overridden options that can be judged on their own.
    ///
    /// Paired bounds are only compared when both sides are overridden.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(value) = self.null_probability {
            check_probability("null_probability", value)?;
        }
        if let Some(value) = self.boolean_true_probability {
            check_probability("boolean_true_probability", value)?;
        }
        if let (Some(min), Some(max)) = (self.min_collection_size, self.max_collection_size) {
            check_bounds(("min_collection_size", min), ("max_collection_size", max))?;
        }
        if let (Some(min), Some(max)) = (self.string_min_length, self.string_max_length) {
            check_bounds(("string_min_length", min), ("string_max_length", max))?;
        }
        Ok(())
    }
}

fn check_probability(option: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { option, value })
    }
}

fn check_bounds(
    (min_option, min): (&'static str, usize),
    (max_option, max): (&'static str, usize),
) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedBounds {
            min_option,
            min,
            max_option,
            max,
        });
    }
    Ok(())
}
