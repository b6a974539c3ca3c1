//! YAML schema files describing externally defined types.
//!
//! A schema lists composite types with their fields and constraints:
//!
//! ```yaml
//! version: 1
//! types:
//!   - name: User
//!     fields:
//!       - name: age
//!         type: int
//!         constraints:
//!           - kind: min
//!             value: 1
//!           - kind: max
//!             value: 100
//!       - name: address
//!         type:
//!           type: object
//!           name: Address
//!   - name: Address
//!     fields:
//!       - name: city
//!         type: string
//! ```

use crate::descriptor::TypeDescriptor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Two types share a name
    #[error("Type defined more than once: {0}")]
    DuplicateType(String),
}

fn default_version() -> u32 {
    1
}

/// Collection of type descriptors loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSchema {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Type definitions
    pub types: Vec<TypeDescriptor>,
}

impl FixtureSchema {
    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let schema: FixtureSchema = serde_yaml::from_str(yaml)?;
        Ok(schema)
    }

    /// Get a type descriptor by name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Get all type names in the schema.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }
}
