//! Mode-resolved generation instructions for one field.

use crate::generators::pattern::CompiledPattern;
use std::sync::Arc;

/// Whether a value must fall inside or outside its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Within,
    Outside,
}

/// Bounds paired with the side the value must land on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target<B> {
    pub bounds: B,
    pub polarity: Polarity,
}

impl<B> Target<B> {
    pub fn within(bounds: B) -> Self {
        Self {
            bounds,
            polarity: Polarity::Within,
        }
    }

    pub fn is_outside(&self) -> bool {
        self.polarity == Polarity::Outside
    }
}

/// Inclusive integer bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntBounds {
    pub min: i64,
    pub max: i64,
}

impl IntBounds {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Floating point bounds with per-side inclusivity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatBounds {
    pub min: f64,
    pub max: f64,
    pub min_inclusive: bool,
    pub max_inclusive: bool,
}

impl FloatBounds {
    pub fn inclusive(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_inclusive: true,
            max_inclusive: true,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        let above = if self.min_inclusive {
            value >= self.min
        } else {
            value > self.min
        };
        let below = if self.max_inclusive {
            value <= self.max
        } else {
            value < self.max
        };
        above && below
    }
}

/// Inclusive length or element-count bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBounds {
    pub min: usize,
    pub max: usize,
}

impl SizeBounds {
    pub fn contains(&self, len: usize) -> bool {
        (self.min..=self.max).contains(&len)
    }
}

/// Null decision for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// A value must be produced
    Required,
    /// Null with the configured probability
    Optional,
    /// The field is left null
    Null,
}

/// Which side of the generation instant a timestamp lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeline {
    Past,
    Future,
}

impl Timeline {
    pub fn flipped(self) -> Self {
        match self {
            Self::Past => Self::Future,
            Self::Future => Self::Past,
        }
    }
}

/// Constraint family chosen for violation in anti-expected mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Presence,
    Range,
    Size,
    Pattern,
    Email,
    Assertion,
    Temporal,
}

/// Compiled pattern with the side the value must land on.
#[derive(Debug, Clone)]
pub struct PatternTarget {
    pub pattern: Arc<CompiledPattern>,
    pub polarity: Polarity,
}

/// Everything a strategy needs to honor for one field in one call.
#[derive(Debug, Clone)]
pub struct ConstraintDirective {
    pub presence: Presence,
    pub int_range: Option<Target<IntBounds>>,
    pub float_range: Option<Target<FloatBounds>>,
    pub size: Option<Target<SizeBounds>>,
    pub pattern: Option<PatternTarget>,
    pub email: Option<Polarity>,
    pub boolean: Option<bool>,
    pub timeline: Option<Timeline>,
    pub violation: Option<Violation>,
}

impl ConstraintDirective {
    /// Directive with no bounds; a value is always produced.
    pub fn unconstrained() -> Self {
        Self {
            presence: Presence::Required,
            int_range: None,
            float_range: None,
            size: None,
            pattern: None,
            email: None,
            boolean: None,
            timeline: None,
            violation: None,
        }
    }
}

impl Default for ConstraintDirective {
    fn default() -> Self {
        Self::unconstrained()
    }
}
