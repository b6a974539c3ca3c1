//! Numeric value strategies.

use super::{float_between, ValueRequest, ValueStrategy};
use crate::context::GenerationContext;
use crate::directive::{FloatBounds, IntBounds};
use crate::error::{GenerationError, UnsupportedReason};
use crate::walker::GraphWalker;
use fixture_core::{FixtureType, FixtureValue};
use rand::Rng;

/// Half-width of the window used for floats without declared bounds.
const DEFAULT_FLOAT_WINDOW: f64 = 1_000_000.0;

/// Integers of any width.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerStrategy;

/// 32 and 64-bit floats.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatStrategy;

impl ValueStrategy for IntegerStrategy {
    fn produce(
        &self,
        request: &ValueRequest<'_>,
        ctx: &mut GenerationContext<'_>,
        _walker: &GraphWalker,
    ) -> Result<FixtureValue, GenerationError> {
        let (type_min, type_max) = request
            .field_type
            .integer_bounds()
            .unwrap_or((i64::MIN, i64::MAX));
        let type_bounds = IntBounds {
            min: type_min,
            max: type_max,
        };
        let retry_limit = ctx.config().retry_limit;

        match request.directive.int_range {
            Some(target) if target.is_outside() => {
                let rng = ctx.rng();
                match int_outside(rng, target.bounds, type_bounds, retry_limit) {
                    Some(value) => Ok(FixtureValue::Int(value)),
                    None => {
                        tracing::warn!(
                            field = %ctx.field_path(),
                            min = target.bounds.min,
                            max = target.bounds.max,
                            "range covers the whole type; no out-of-range integer exists"
                        );
                        Err(ctx.unsupported(
                            request.field_type,
                            UnsupportedReason::RetryExhausted {
                                attempts: retry_limit,
                            },
                        ))
                    }
                }
            }
            Some(target) => Ok(FixtureValue::Int(int_within(ctx.rng(), target.bounds))),
            None => Ok(FixtureValue::Int(int_within(ctx.rng(), type_bounds))),
        }
    }
}

/// Uniform integer inside inclusive bounds.
pub fn int_within<R: Rng + ?Sized>(rng: &mut R, bounds: IntBounds) -> i64 {
    if bounds.min >= bounds.max {
        return bounds.min;
    }
    rng.random_range(bounds.min..=bounds.max)
}

/// Integer outside `bounds` but representable in `type_bounds`.
///
/// Values are drawn close to the violated edge so failures read clearly.
pub fn int_outside<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: IntBounds,
    type_bounds: IntBounds,
    retry_limit: u32,
) -> Option<i64> {
    let width = bounds.max.abs_diff(bounds.min).clamp(1, 100);
    let can_go_below = bounds.min > type_bounds.min;
    let can_go_above = bounds.max < type_bounds.max;

    for _ in 0..retry_limit.max(1) {
        let below = match (can_go_below, can_go_above) {
            (false, false) => return None,
            (true, false) => true,
            (false, true) => false,
            (true, true) => rng.random_bool(0.5),
        };
        let offset = rng.random_range(1..=width);
        let candidate = if below {
            bounds.min.checked_sub_unsigned(offset).unwrap_or(type_bounds.min)
        } else {
            bounds.max.checked_add_unsigned(offset).unwrap_or(type_bounds.max)
        };
        let candidate = candidate.clamp(type_bounds.min, type_bounds.max);
        if !bounds.contains(candidate) {
            return Some(candidate);
        }
    }
    None
}

impl ValueStrategy for FloatStrategy {
    fn produce(
        &self,
        request: &ValueRequest<'_>,
        ctx: &mut GenerationContext<'_>,
        _walker: &GraphWalker,
    ) -> Result<FixtureValue, GenerationError> {
        let (type_min, type_max) = request
            .field_type
            .float_bounds()
            .unwrap_or((f64::MIN, f64::MAX));
        let narrow = matches!(request.field_type, FixtureType::Float32);
        let retry_limit = ctx.config().retry_limit;

        let target = request.directive.float_range.unwrap_or_else(|| {
            crate::directive::Target::within(FloatBounds::inclusive(
                -DEFAULT_FLOAT_WINDOW,
                DEFAULT_FLOAT_WINDOW,
            ))
        });

        let rng = ctx.rng();
        let value = if target.is_outside() {
            float_outside(rng, target.bounds, (type_min, type_max), narrow, retry_limit)
        } else {
            float_within(rng, target.bounds, narrow, retry_limit)
        };

        match value {
            Some(v) => Ok(FixtureValue::Float(v)),
            None => {
                tracing::warn!(
                    field = %ctx.field_path(),
                    min = target.bounds.min,
                    max = target.bounds.max,
                    outside = target.is_outside(),
                    "no float found for bounds"
                );
                Err(ctx.unsupported(
                    request.field_type,
                    UnsupportedReason::RetryExhausted {
                        attempts: retry_limit,
                    },
                ))
            }
        }
    }
}

fn round_to_width(value: f64, narrow: bool) -> f64 {
    if narrow {
        value as f32 as f64
    } else {
        value
    }
}

/// Float inside `bounds`, honoring exclusive edges.
pub fn float_within<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: FloatBounds,
    narrow: bool,
    retry_limit: u32,
) -> Option<f64> {
    for _ in 0..retry_limit.max(1) {
        let candidate = round_to_width(float_between(rng, bounds.min, bounds.max), narrow);
        if bounds.contains(candidate) {
            return Some(candidate);
        }
    }
    let midpoint = round_to_width(bounds.min / 2.0 + bounds.max / 2.0, narrow);
    bounds.contains(midpoint).then_some(midpoint)
}

/// Float outside `bounds` but finite and inside the type's range.
pub fn float_outside<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: FloatBounds,
    (type_min, type_max): (f64, f64),
    narrow: bool,
    retry_limit: u32,
) -> Option<f64> {
    let width = (bounds.max / 2.0 - bounds.min / 2.0).abs().clamp(1.0, DEFAULT_FLOAT_WINDOW);
    let can_go_below = bounds.min > type_min || !bounds.min_inclusive;
    let can_go_above = bounds.max < type_max || !bounds.max_inclusive;

    for _ in 0..retry_limit.max(1) {
        let below = match (can_go_below, can_go_above) {
            (false, false) => return None,
            (true, false) => true,
            (false, true) => false,
            (true, true) => rng.random_bool(0.5),
        };
        let offset = float_between(rng, 0.0, width);
        let candidate = if below {
            (bounds.min - offset).max(type_min)
        } else {
            (bounds.max + offset).min(type_max)
        };
        let candidate = round_to_width(candidate, narrow);
        if candidate.is_finite() && !bounds.contains(candidate) {
            return Some(candidate);
        }
    }
    None
}
