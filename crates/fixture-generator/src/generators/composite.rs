//! Composite strategy.

use super::{ValueRequest, ValueStrategy};
use crate::context::GenerationContext;
use crate::error::{GenerationError, UnsupportedReason};
use crate::walker::GraphWalker;
use fixture_core::FixtureValue;

/// Recurse into a registered object type.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeStrategy;

impl ValueStrategy for CompositeStrategy {
    fn produce(
        &self,
        request: &ValueRequest<'_>,
        ctx: &mut GenerationContext<'_>,
        walker: &GraphWalker,
    ) -> Result<FixtureValue, GenerationError> {
        match request.field_type.object_name() {
            Some(name) => walker.walk_object(name, ctx),
            None => Err(ctx.unsupported(request.field_type, UnsupportedReason::Opaque)),
        }
    }
}
