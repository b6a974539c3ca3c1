//! Boolean strategy.

use super::{ValueRequest, ValueStrategy};
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::walker::GraphWalker;
use fixture_core::FixtureValue;
use rand::Rng;

/// Forced by assertions, otherwise biased by `boolean_true_probability`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanStrategy;

impl ValueStrategy for BooleanStrategy {
    fn produce(
        &self,
        request: &ValueRequest<'_>,
        ctx: &mut GenerationContext<'_>,
        _walker: &GraphWalker,
    ) -> Result<FixtureValue, GenerationError> {
        if let Some(forced) = request.directive.boolean {
            return Ok(FixtureValue::Bool(forced));
        }
        let (config, rng) = ctx.config_and_rng();
        Ok(FixtureValue::Bool(rng.random_bool(config.boolean_true_probability)))
    }
}
