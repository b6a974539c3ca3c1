//! Enumeration strategy.

use super::{ValueRequest, ValueStrategy};
use crate::context::{GenerationContext, InjectType};
use crate::error::GenerationError;
use crate::walker::GraphWalker;
use fixture_core::{FixtureType, FixtureValue};
use rand::Rng;

/// Uniform pick among the declared constants.
///
/// There is no constant outside an enumeration, so anti-expected mode can
/// only break it through null, and only when the field admits null.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumStrategy;

impl ValueStrategy for EnumStrategy {
    fn produce(
        &self,
        request: &ValueRequest<'_>,
        ctx: &mut GenerationContext<'_>,
        _walker: &GraphWalker,
    ) -> Result<FixtureValue, GenerationError> {
        let values = match request.field_type {
            FixtureType::Enum { values } => values.as_slice(),
            _ => &[],
        };
        if values.is_empty() {
            tracing::warn!(field = %ctx.field_path(), "enumeration has no constants; leaving null");
            return Ok(FixtureValue::Null);
        }
        if ctx.mode() == InjectType::AntiExpected && request.nullable && request.directive.violation.is_none() {
            return Ok(FixtureValue::Null);
        }
        let idx = ctx.rng().random_range(0..values.len());
        Ok(FixtureValue::Enum(values[idx].clone()))
    }
}
