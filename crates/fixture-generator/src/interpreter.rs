//! Translation of constraint metadata into directives.
//!
//! Constraints are read in a fixed priority order: nullability, range,
//! size, pattern/email, boolean assertions, temporal direction. Conflicts
//! resolve with pattern > range > size and are logged, never raised.

use crate::capability::Capability;
use crate::context::InjectType;
use crate::directive::{
    ConstraintDirective, FloatBounds, IntBounds, PatternTarget, Polarity, Presence, SizeBounds,
    Target, Timeline, Violation,
};
use crate::generators::pattern::{CompiledPattern, PatternError};
use dashmap::DashMap;
use fixture_core::{Constraint, FieldDescriptor, FixtureType, GenerationConfig, StringFormat};
use rand::Rng;
use std::sync::Arc;

/// Width of the default window for floats without a declared bound.
const FLOAT_WINDOW: f64 = 1_000_000.0;

/// Builds a [`ConstraintDirective`] for a field and a mode.
///
/// Compiled patterns are cached and shared between sessions.
#[derive(Debug, Default)]
pub struct ConstraintInterpreter {
    patterns: DashMap<String, Arc<CompiledPattern>>,
}

/// A constraint family that can be broken, and whether breaking it is possible.
struct Candidate {
    violation: Violation,
    satisfiable: bool,
}

impl ConstraintInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the directive for `field`.
    ///
    /// Fields without constraints yield the same directive in expected and
    /// anti-expected mode.
    pub fn directive<R: Rng + ?Sized>(
        &self,
        field: &FieldDescriptor,
        capability: Capability,
        mode: InjectType,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> Result<ConstraintDirective, PatternError> {
        let mut directive = ConstraintDirective::unconstrained();
        if mode == InjectType::DefaultValue {
            return Ok(directive);
        }

        let constraints: Vec<&Constraint> = field
            .constraints
            .iter()
            .filter(|c| {
                let applies = applies_to(c, capability);
                if !applies {
                    tracing::debug!(field = %field.name, constraint = %c, %capability, "ignoring constraint not applicable to capability");
                }
                applies
            })
            .collect();

        // Nullability
        let requires_value = constraints
            .iter()
            .any(|c| matches!(c, Constraint::NotNull | Constraint::NotEmpty | Constraint::NotBlank));
        let must_be_null = constraints.iter().any(|c| matches!(c, Constraint::Null));
        if requires_value && must_be_null {
            tracing::warn!(field = %field.name, "conflicting null and not-null constraints; requiring a value");
        }
        directive.presence = if requires_value {
            Presence::Required
        } else if must_be_null {
            Presence::Null
        } else if field.nullable {
            Presence::Optional
        } else {
            Presence::Required
        };

        // Range
        match capability {
            Capability::Integer => {
                directive.int_range =
                    integer_bounds(&field.name, &field.field_type, &constraints).map(Target::within);
            }
            Capability::Float => {
                directive.float_range =
                    float_bounds(&field.name, &field.field_type, &constraints).map(Target::within);
            }
            _ => {}
        }

        // Pattern, compiled before size so length bounds can follow it
        let pattern = constraints.iter().find_map(|c| match c {
            Constraint::Pattern { regexp } => Some(regexp.as_str()),
            _ => None,
        });
        if let Some(regexp) = pattern {
            directive.pattern = Some(PatternTarget {
                pattern: self.compiled(regexp)?,
                polarity: Polarity::Within,
            });
        }

        // Size; without a declared maximum only the lower side can be broken
        let size_max_declared = constraints
            .iter()
            .any(|c| matches!(c, Constraint::Size { max: Some(_), .. }));
        if capability.is_sized() {
            let defaults = default_size(capability, config);
            let mut size = size_bounds(&field.name, &constraints, defaults);
            if let (Some(bounds), Some(target)) = (size, &directive.pattern) {
                size = Some(clamp_to_pattern(&field.name, bounds, &target.pattern, defaults));
            }
            directive.size = size.map(Target::within);
        }

        // Email
        let email_constraint = constraints.iter().any(|c| matches!(c, Constraint::Email));
        if capability == Capability::Text && (email_constraint || field.format == StringFormat::Email) {
            directive.email = Some(Polarity::Within);
        }

        // Boolean assertions
        for c in &constraints {
            let forced = match c {
                Constraint::AssertTrue => true,
                Constraint::AssertFalse => false,
                _ => continue,
            };
            if directive.boolean.is_some_and(|existing| existing != forced) {
                tracing::warn!(field = %field.name, "conflicting boolean assertions; keeping the first");
                continue;
            }
            directive.boolean = Some(forced);
        }

        // Temporal direction
        for c in &constraints {
            let timeline = match c {
                Constraint::Past => Timeline::Past,
                Constraint::Future => Timeline::Future,
                _ => continue,
            };
            if directive.timeline.is_some_and(|existing| existing != timeline) {
                tracing::warn!(field = %field.name, "conflicting past and future constraints; keeping the first");
                continue;
            }
            directive.timeline = Some(timeline);
        }

        if mode == InjectType::AntiExpected {
            let candidates = violation_candidates(
                &field.field_type,
                &directive,
                requires_value,
                must_be_null,
                email_constraint,
                size_max_declared,
            );
            apply_violation(field, &mut directive, candidates, requires_value, rng);
            if directive.violation == Some(Violation::Size) && !size_max_declared {
                if let Some(target) = directive.size.as_mut() {
                    target.bounds.max = usize::MAX;
                }
            }
        }

        Ok(directive)
    }

    fn compiled(&self, regexp: &str) -> Result<Arc<CompiledPattern>, PatternError> {
        if let Some(pattern) = self.patterns.get(regexp) {
            return Ok(Arc::clone(pattern.value()));
        }
        let compiled = Arc::new(CompiledPattern::compile(regexp)?);
        let entry = self
            .patterns
            .entry(regexp.to_string())
            .or_insert(compiled);
        Ok(Arc::clone(entry.value()))
    }
}

fn applies_to(constraint: &Constraint, capability: Capability) -> bool {
    match constraint {
        Constraint::NotNull | Constraint::Null => true,
        Constraint::NotEmpty => capability.is_sized(),
        Constraint::NotBlank => capability == Capability::Text,
        Constraint::Min { .. }
        | Constraint::Max { .. }
        | Constraint::DecimalMin { .. }
        | Constraint::DecimalMax { .. }
        | Constraint::Positive
        | Constraint::PositiveOrZero
        | Constraint::Negative
        | Constraint::NegativeOrZero => {
            matches!(capability, Capability::Integer | Capability::Float)
        }
        Constraint::Size { .. } => capability.is_sized(),
        Constraint::Pattern { .. } | Constraint::Email => capability == Capability::Text,
        Constraint::AssertTrue | Constraint::AssertFalse => capability == Capability::Boolean,
        Constraint::Past | Constraint::Future => capability == Capability::DateTime,
    }
}

fn tighter_min(current: Option<i64>, candidate: i64) -> Option<i64> {
    Some(current.map_or(candidate, |c| c.max(candidate)))
}

fn tighter_max(current: Option<i64>, candidate: i64) -> Option<i64> {
    Some(current.map_or(candidate, |c| c.min(candidate)))
}

/// Integer bounds intersected with the type's representable range.
///
/// Explicit bounds (`min`, `max`, `decimal_*`) win over sign constraints;
/// bounds that stay inverted are swapped.
fn integer_bounds(field: &str, ty: &FixtureType, constraints: &[&Constraint]) -> Option<IntBounds> {
    let (type_min, type_max) = ty.integer_bounds()?;
    let (mut explicit_min, mut explicit_max) = (None, None);
    let (mut sign_min, mut sign_max) = (None, None);

    for c in constraints {
        match c {
            Constraint::Min { value } => explicit_min = tighter_min(explicit_min, *value),
            Constraint::Max { value } => explicit_max = tighter_max(explicit_max, *value),
            Constraint::DecimalMin { value, inclusive } => {
                let bound = if *inclusive {
                    value.ceil()
                } else {
                    value.floor() + 1.0
                };
                explicit_min = tighter_min(explicit_min, bound as i64);
            }
            Constraint::DecimalMax { value, inclusive } => {
                let bound = if *inclusive {
                    value.floor()
                } else {
                    value.ceil() - 1.0
                };
                explicit_max = tighter_max(explicit_max, bound as i64);
            }
            Constraint::Positive => sign_min = tighter_min(sign_min, 1),
            Constraint::PositiveOrZero => sign_min = tighter_min(sign_min, 0),
            Constraint::Negative => sign_max = tighter_max(sign_max, -1),
            Constraint::NegativeOrZero => sign_max = tighter_max(sign_max, 0),
            _ => {}
        }
    }

    if explicit_min.is_none() && explicit_max.is_none() && sign_min.is_none() && sign_max.is_none() {
        return None;
    }

    let min = [Some(type_min), explicit_min, sign_min].into_iter().flatten().max()?;
    let max = [Some(type_max), explicit_max, sign_max].into_iter().flatten().min()?;
    if min <= max {
        return Some(IntBounds { min, max });
    }

    tracing::warn!(field, min, max, "conflicting range constraints; keeping explicit bounds");
    let min = explicit_min.map_or(type_min, |m| m.max(type_min));
    let max = explicit_max.map_or(type_max, |m| m.min(type_max));
    if min <= max {
        return Some(IntBounds { min, max });
    }

    tracing::warn!(field, min, max, "inverted range constraints; swapping bounds");
    Some(IntBounds {
        min: max.clamp(type_min, type_max),
        max: min.clamp(type_min, type_max),
    })
}

type FloatBound = (f64, bool);

fn tighter_lower(current: Option<FloatBound>, candidate: FloatBound) -> Option<FloatBound> {
    Some(match current {
        None => candidate,
        Some(c) if candidate.0 > c.0 || (candidate.0 == c.0 && !candidate.1) => candidate,
        Some(c) => c,
    })
}

fn tighter_upper(current: Option<FloatBound>, candidate: FloatBound) -> Option<FloatBound> {
    Some(match current {
        None => candidate,
        Some(c) if candidate.0 < c.0 || (candidate.0 == c.0 && !candidate.1) => candidate,
        Some(c) => c,
    })
}

fn non_empty(lower: FloatBound, upper: FloatBound) -> bool {
    lower.0 < upper.0 || (lower.0 == upper.0 && lower.1 && upper.1)
}

/// Float bounds; a missing side extends a fixed window past the other one.
fn float_bounds(field: &str, ty: &FixtureType, constraints: &[&Constraint]) -> Option<FloatBounds> {
    let (type_min, type_max) = ty.float_bounds()?;
    let (mut explicit_min, mut explicit_max) = (None, None);
    let (mut sign_min, mut sign_max) = (None, None);

    for c in constraints {
        match c {
            Constraint::Min { value } => explicit_min = tighter_lower(explicit_min, (*value as f64, true)),
            Constraint::Max { value } => explicit_max = tighter_upper(explicit_max, (*value as f64, true)),
            Constraint::DecimalMin { value, inclusive } => {
                explicit_min = tighter_lower(explicit_min, (*value, *inclusive))
            }
            Constraint::DecimalMax { value, inclusive } => {
                explicit_max = tighter_upper(explicit_max, (*value, *inclusive))
            }
            Constraint::Positive => sign_min = tighter_lower(sign_min, (0.0, false)),
            Constraint::PositiveOrZero => sign_min = tighter_lower(sign_min, (0.0, true)),
            Constraint::Negative => sign_max = tighter_upper(sign_max, (0.0, false)),
            Constraint::NegativeOrZero => sign_max = tighter_upper(sign_max, (0.0, true)),
            _ => {}
        }
    }

    if explicit_min.is_none() && explicit_max.is_none() && sign_min.is_none() && sign_max.is_none() {
        return None;
    }

    let combine = |lower: Option<FloatBound>, upper: Option<FloatBound>| {
        let lower = lower.unwrap_or_else(|| {
            let anchor = upper.map_or(FLOAT_WINDOW, |u| u.0);
            ((anchor - 2.0 * FLOAT_WINDOW).max(type_min), true)
        });
        let upper = upper.unwrap_or_else(|| ((lower.0 + 2.0 * FLOAT_WINDOW).min(type_max), true));
        (
            (lower.0.max(type_min), lower.1),
            (upper.0.min(type_max), upper.1),
        )
    };

    let merged_lower = match (explicit_min, sign_min) {
        (Some(e), Some(s)) => tighter_lower(Some(e), s),
        (e, s) => e.or(s),
    };
    let merged_upper = match (explicit_max, sign_max) {
        (Some(e), Some(s)) => tighter_upper(Some(e), s),
        (e, s) => e.or(s),
    };
    let (lower, upper) = combine(merged_lower, merged_upper);
    if non_empty(lower, upper) {
        return Some(float_target(lower, upper));
    }

    tracing::warn!(field, "conflicting range constraints; keeping explicit bounds");
    let (lower, upper) = combine(explicit_min, explicit_max);
    if non_empty(lower, upper) {
        return Some(float_target(lower, upper));
    }

    tracing::warn!(field, "inverted range constraints; swapping bounds");
    Some(FloatBounds::inclusive(upper.0, lower.0))
}

fn float_target(lower: FloatBound, upper: FloatBound) -> FloatBounds {
    FloatBounds {
        min: lower.0,
        max: upper.0,
        min_inclusive: lower.1,
        max_inclusive: upper.1,
    }
}

/// Configured length/count range for a sized capability.
pub(crate) fn default_size(capability: Capability, config: &GenerationConfig) -> SizeBounds {
    match capability {
        Capability::Text => SizeBounds {
            min: config.string_min_length,
            max: config.string_max_length,
        },
        _ => SizeBounds {
            min: config.min_collection_size,
            max: config.max_collection_size,
        },
    }
}

fn size_bounds(field: &str, constraints: &[&Constraint], defaults: SizeBounds) -> Option<SizeBounds> {
    let (mut min, mut max) = (None::<usize>, None::<usize>);
    let mut declared = false;
    let mut non_empty = false;

    for c in constraints {
        match c {
            Constraint::Size { min: lo, max: hi } => {
                declared = true;
                if let Some(lo) = lo {
                    min = Some(min.map_or(*lo, |m| m.max(*lo)));
                }
                if let Some(hi) = hi {
                    max = Some(max.map_or(*hi, |m| m.min(*hi)));
                }
            }
            Constraint::NotEmpty | Constraint::NotBlank => non_empty = true,
            _ => {}
        }
    }

    if !declared && !non_empty {
        return None;
    }

    let span = defaults.max.saturating_sub(defaults.min);
    let max = max.unwrap_or_else(|| match min {
        Some(lo) if lo > defaults.max => lo.saturating_add(span),
        _ => defaults.max,
    });
    let mut min = min.unwrap_or_else(|| defaults.min.min(max));
    if non_empty {
        min = min.max(1);
    }

    if min > max {
        tracing::warn!(field, min, max, "inverted size constraints; swapping bounds");
        return Some(SizeBounds { min: max, max: min });
    }
    Some(SizeBounds { min, max })
}

/// Narrow size bounds to lengths the pattern can produce.
fn clamp_to_pattern(
    field: &str,
    bounds: SizeBounds,
    pattern: &CompiledPattern,
    defaults: SizeBounds,
) -> SizeBounds {
    let (pattern_min, pattern_max) = pattern.length_bounds();
    let pattern_max = pattern_max.unwrap_or(usize::MAX);
    let min = bounds.min.max(pattern_min);
    let max = bounds.max.min(pattern_max);
    if min <= max {
        return SizeBounds { min, max };
    }

    tracing::warn!(
        field,
        pattern = pattern.source(),
        "size constraint incompatible with pattern; following the pattern"
    );
    let span = defaults.max.saturating_sub(defaults.min);
    SizeBounds {
        min: pattern_min,
        max: pattern_max.min(pattern_min.saturating_add(span)),
    }
}

fn violation_candidates(
    ty: &FixtureType,
    directive: &ConstraintDirective,
    requires_value: bool,
    must_be_null: bool,
    email_constraint: bool,
    size_max_declared: bool,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let mut push = |violation, satisfiable| candidates.push(Candidate { violation, satisfiable });

    if requires_value || must_be_null {
        push(Violation::Presence, true);
    }
    if let Some(target) = &directive.int_range {
        let satisfiable = ty
            .integer_bounds()
            .is_some_and(|(lo, hi)| target.bounds.min > lo || target.bounds.max < hi);
        push(Violation::Range, satisfiable);
    }
    if let Some(target) = &directive.float_range {
        let satisfiable = ty
            .float_bounds()
            .is_some_and(|(lo, hi)| target.bounds.min > lo || target.bounds.max < hi);
        push(Violation::Range, satisfiable);
    }
    if let Some(target) = &directive.size {
        push(Violation::Size, size_max_declared || target.bounds.min > 0);
    }
    if directive.pattern.is_some() {
        push(Violation::Pattern, true);
    }
    if email_constraint {
        push(Violation::Email, true);
    }
    if directive.boolean.is_some() {
        push(Violation::Assertion, true);
    }
    if directive.timeline.is_some() {
        push(Violation::Temporal, true);
    }
    candidates
}

/// Pick one violation uniformly among satisfiable candidates and apply it.
fn apply_violation<R: Rng + ?Sized>(
    field: &FieldDescriptor,
    directive: &mut ConstraintDirective,
    candidates: Vec<Candidate>,
    requires_value: bool,
    rng: &mut R,
) {
    if candidates.is_empty() {
        tracing::trace!(field = %field.name, "no constraints to violate; generating unconstrained value");
        return;
    }

    let satisfiable: Vec<Violation> = candidates
        .iter()
        .filter(|c| c.satisfiable)
        .map(|c| c.violation)
        .collect();
    let pool = if satisfiable.is_empty() {
        tracing::debug!(field = %field.name, "no satisfiable violation; strategy will exhaust its retries");
        candidates.iter().map(|c| c.violation).collect()
    } else {
        satisfiable
    };
    let violation = pool[rng.random_range(0..pool.len())];

    directive.presence = Presence::Required;
    match violation {
        Violation::Presence => {
            // A required value becomes null; a null-only field gets a value.
            if requires_value {
                directive.presence = Presence::Null;
            }
        }
        Violation::Range => {
            if let Some(target) = directive.int_range.as_mut() {
                target.polarity = Polarity::Outside;
            }
            if let Some(target) = directive.float_range.as_mut() {
                target.polarity = Polarity::Outside;
            }
        }
        Violation::Size => {
            if let Some(target) = directive.size.as_mut() {
                target.polarity = Polarity::Outside;
            }
        }
        Violation::Pattern => {
            if let Some(target) = directive.pattern.as_mut() {
                target.polarity = Polarity::Outside;
            }
        }
        Violation::Email => directive.email = Some(Polarity::Outside),
        Violation::Assertion => directive.boolean = directive.boolean.map(|b| !b),
        Violation::Temporal => directive.timeline = directive.timeline.map(Timeline::flipped),
    }
    tracing::trace!(field = %field.name, ?violation, "selected constraint to violate");
    directive.violation = Some(violation);
}
