//! Declarative field constraints.
//!
//! Constraints are metadata attached to a field by whoever describes the
//! type. The generator only reads them; it never defines new ones.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single declared rule on a field.
///
/// In YAML each constraint is a map tagged by `kind`:
/// ```yaml
/// constraints:
///   - kind: not_null
///   - kind: min
///     value: 1
///   - kind: size
///     min: 2
///     max: 5
///   - kind: pattern
///     regexp: "[a-z]{3}"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Value must be present
    NotNull,

    /// Value must be absent
    Null,

    /// Present, and strings/containers must have at least one element
    NotEmpty,

    /// Present, and strings must contain a non-whitespace character
    NotBlank,

    /// Integer lower bound (inclusive)
    Min { value: i64 },

    /// Integer upper bound (inclusive)
    Max { value: i64 },

    /// Decimal lower bound
    DecimalMin {
        value: f64,
        #[serde(default = "default_inclusive")]
        inclusive: bool,
    },

    /// Decimal upper bound
    DecimalMax {
        value: f64,
        #[serde(default = "default_inclusive")]
        inclusive: bool,
    },

    /// Strictly greater than zero
    Positive,

    /// Greater than or equal to zero
    PositiveOrZero,

    /// Strictly less than zero
    Negative,

    /// Less than or equal to zero
    NegativeOrZero,

    /// Length bounds for strings and element-count bounds for containers
    Size {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },

    /// String must match the regular expression (anchored to the whole value)
    Pattern { regexp: String },

    /// String must be an email address
    Email,

    /// Boolean must be true
    AssertTrue,

    /// Boolean must be false
    AssertFalse,

    /// Timestamp must lie before the generation instant
    Past,

    /// Timestamp must lie after the generation instant
    Future,
}

fn default_inclusive() -> bool {
    true
}

impl Constraint {
    /// Snake-case name matching the YAML `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotNull => "not_null",
            Self::Null => "null",
            Self::NotEmpty => "not_empty",
            Self::NotBlank => "not_blank",
            Self::Min { .. } => "min",
            Self::Max { .. } => "max",
            Self::DecimalMin { .. } => "decimal_min",
            Self::DecimalMax { .. } => "decimal_max",
            Self::Positive => "positive",
            Self::PositiveOrZero => "positive_or_zero",
            Self::Negative => "negative",
            Self::NegativeOrZero => "negative_or_zero",
            Self::Size { .. } => "size",
            Self::Pattern { .. } => "pattern",
            Self::Email => "email",
            Self::AssertTrue => "assert_true",
            Self::AssertFalse => "assert_false",
            Self::Past => "past",
            Self::Future => "future",
        }
    }

    /// Create a size constraint with both bounds.
    pub fn size(min: usize, max: usize) -> Self {
        Self::Size {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Create a pattern constraint.
    pub fn pattern(regexp: impl Into<String>) -> Self {
        Self::Pattern {
            regexp: regexp.into(),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min { value } | Self::Max { value } => write!(f, "{}({value})", self.kind()),
            Self::DecimalMin { value, inclusive } | Self::DecimalMax { value, inclusive } => {
                write!(f, "{}({value}, inclusive={inclusive})", self.kind())
            }
            Self::Size { min, max } => write!(f, "size({min:?}..{max:?})"),
            Self::Pattern { regexp } => write!(f, "pattern({regexp})"),
            other => f.write_str(other.kind()),
        }
    }
}

/// Specialised string shape, orthogonal to the generation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringFormat {
    /// Printable characters
    #[default]
    Plain,
    /// `local@domain.tld`
    Email,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_constraint_list() {
        let yaml = r#"
- kind: not_null
- kind: min
  value: 1
- kind: decimal_max
  value: 9.5
  inclusive: false
- kind: size
  max: 5
- kind: pattern
  regexp: "[a-z]+"
- kind: assert_true
"#;
        let parsed: Vec<Constraint> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            parsed,
            vec![
                Constraint::NotNull,
                Constraint::Min { value: 1 },
                Constraint::DecimalMax {
                    value: 9.5,
                    inclusive: false
                },
                Constraint::Size {
                    min: None,
                    max: Some(5)
                },
                Constraint::pattern("[a-z]+"),
                Constraint::AssertTrue,
            ]
        );
    }

    #[test]
    fn test_decimal_bound_defaults_to_inclusive() {
        let parsed: Constraint = serde_yaml::from_str("kind: decimal_min\nvalue: 0.5").unwrap();
        assert_eq!(
            parsed,
            Constraint::DecimalMin {
                value: 0.5,
                inclusive: true
            }
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Constraint::Min { value: 3 }.to_string(), "min(3)");
        assert_eq!(Constraint::NotBlank.to_string(), "not_blank");
        assert_eq!(Constraint::size(2, 5).to_string(), "size(Some(2)..Some(5))");
    }
}
