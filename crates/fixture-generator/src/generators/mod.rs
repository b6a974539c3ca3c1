//! Value strategies for each capability.
//!
//! A strategy turns a [`ValueRequest`] into a [`FixtureValue`]. Strategies
//! for containers and composites call back into the [`GraphWalker`] for
//! their elements so cycle and depth guards apply everywhere.

pub mod array;
pub mod boolean;
pub mod composite;
pub mod enumeration;
pub mod numeric;
pub mod pattern;
pub mod text;
pub mod timestamp;
pub mod uuid;
pub mod zero;

use crate::context::GenerationContext;
use crate::directive::{ConstraintDirective, SizeBounds};
use crate::error::GenerationError;
use crate::walker::GraphWalker;
use fixture_core::{FixtureType, FixtureValue};
use rand::distr::Alphanumeric;
use rand::Rng;

/// Widest distance past a size bound used for out-of-range lengths.
const MAX_OUTSIDE_SPAN: usize = 8;

/// Everything a strategy is asked to produce for one slot.
#[derive(Debug, Clone, Copy)]
pub struct ValueRequest<'a> {
    /// Declared shape of the slot
    pub field_type: &'a FixtureType,
    /// Mode-resolved instructions
    pub directive: &'a ConstraintDirective,
    /// Whether the slot accepts null
    pub nullable: bool,
}

/// Trait for producing values of one capability.
pub trait ValueStrategy: Send + Sync {
    /// Produce a value honoring the request's directive.
    fn produce(
        &self,
        request: &ValueRequest<'_>,
        ctx: &mut GenerationContext<'_>,
        walker: &GraphWalker,
    ) -> Result<FixtureValue, GenerationError>;
}

/// Pick a length inside `bounds`.
pub(crate) fn size_within<R: Rng + ?Sized>(rng: &mut R, bounds: SizeBounds) -> usize {
    if bounds.min >= bounds.max {
        return bounds.min;
    }
    rng.random_range(bounds.min..=bounds.max)
}

/// Pick a length outside `bounds`, or `None` when every length is inside.
pub(crate) fn size_outside<R: Rng + ?Sized>(rng: &mut R, bounds: SizeBounds) -> Option<usize> {
    let span = bounds
        .max
        .saturating_sub(bounds.min)
        .clamp(1, MAX_OUTSIDE_SPAN);
    let below = (bounds.min > 0).then(|| {
        let floor = bounds.min.saturating_sub(span);
        floor..=bounds.min - 1
    });
    let above = (bounds.max < usize::MAX).then(|| {
        let start = bounds.max + 1;
        start..=start.saturating_add(span - 1)
    });

    match (below, above) {
        (Some(below), Some(above)) => {
            if rng.random_bool(0.5) {
                Some(rng.random_range(below))
            } else {
                Some(rng.random_range(above))
            }
        }
        (Some(range), None) | (None, Some(range)) => Some(rng.random_range(range)),
        (None, None) => None,
    }
}

/// Random ASCII letters and digits.
pub(crate) fn alphanumeric<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// Uniform sample between two finite floats without overflowing.
pub(crate) fn float_between<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if lo >= hi {
        return lo;
    }
    let t: f64 = rng.random();
    let value = lo * (1.0 - t) + hi * t;
    value.clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_size_within() {
        let mut rng = StdRng::seed_from_u64(42);
        let bounds = SizeBounds { min: 2, max: 5 };
        for _ in 0..100 {
            assert!(bounds.contains(size_within(&mut rng, bounds)));
        }
        assert_eq!(size_within(&mut rng, SizeBounds { min: 3, max: 3 }), 3);
    }

    #[test]
    fn test_size_outside() {
        let mut rng = StdRng::seed_from_u64(42);
        let bounds = SizeBounds { min: 2, max: 5 };
        let mut saw_below = false;
        let mut saw_above = false;
        for _ in 0..200 {
            let len = size_outside(&mut rng, bounds).unwrap();
            assert!(!bounds.contains(len));
            saw_below |= len < 2;
            saw_above |= len > 5;
        }
        assert!(saw_below && saw_above);

        let zero_min = SizeBounds { min: 0, max: 3 };
        for _ in 0..50 {
            assert!(size_outside(&mut rng, zero_min).unwrap() > 3);
        }

        let everything = SizeBounds {
            min: 0,
            max: usize::MAX,
        };
        assert_eq!(size_outside(&mut rng, everything), None);
    }

    #[test]
    fn test_float_between_extremes() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let value = float_between(&mut rng, f64::MIN, f64::MAX);
            assert!(value.is_finite());
        }
        assert_eq!(float_between(&mut rng, 1.5, 1.5), 1.5);
    }

    #[test]
    fn test_alphanumeric() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = alphanumeric(&mut rng, 12);
        assert_eq!(value.len(), 12);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
