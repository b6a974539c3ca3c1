//! Timestamp strategy.

use super::{ValueRequest, ValueStrategy};
use crate::context::GenerationContext;
use crate::directive::Timeline;
use crate::error::GenerationError;
use crate::walker::GraphWalker;
use chrono::{DateTime, Utc};
use fixture_core::FixtureValue;
use rand::Rng;

/// Widest offset from the generation instant, one year in seconds.
const MAX_OFFSET_SECS: i64 = 365 * 24 * 60 * 60;

/// UTC timestamps within a year of now, on the side the directive asks for.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeStrategy;

impl ValueStrategy for DateTimeStrategy {
    fn produce(
        &self,
        request: &ValueRequest<'_>,
        ctx: &mut GenerationContext<'_>,
        _walker: &GraphWalker,
    ) -> Result<FixtureValue, GenerationError> {
        let now = Utc::now();
        let value = generate_timestamp(ctx.rng(), now, request.directive.timeline);
        Ok(FixtureValue::DateTime(value))
    }
}

/// Random whole-second timestamp relative to `now`.
///
/// `Past` and `Future` exclude `now` itself.
pub fn generate_timestamp<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    timeline: Option<Timeline>,
) -> DateTime<Utc> {
    let now_ts = now.timestamp();
    let offset = match timeline {
        Some(Timeline::Past) => -rng.random_range(1..=MAX_OFFSET_SECS),
        Some(Timeline::Future) => rng.random_range(1..=MAX_OFFSET_SECS),
        None => rng.random_range(-MAX_OFFSET_SECS..=MAX_OFFSET_SECS),
    };
    DateTime::from_timestamp(now_ts + offset, 0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_past_and_future() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc::now();
        for _ in 0..100 {
            assert!(generate_timestamp(&mut rng, now, Some(Timeline::Past)) < now);
            assert!(generate_timestamp(&mut rng, now, Some(Timeline::Future)) > now);
        }
    }

    #[test]
    fn test_unconstrained_within_a_year() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc::now();
        for _ in 0..100 {
            let value = generate_timestamp(&mut rng, now, None);
            assert!((value.timestamp() - now.timestamp()).abs() <= MAX_OFFSET_SECS);
        }
    }
}
