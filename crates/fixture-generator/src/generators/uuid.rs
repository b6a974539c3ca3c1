//! UUID strategy.

use super::{ValueRequest, ValueStrategy};
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::walker::GraphWalker;
use fixture_core::FixtureValue;
use rand::Rng;
use uuid::Uuid;

/// Random version 4 UUIDs drawn from the session engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidStrategy;

impl ValueStrategy for UuidStrategy {
    fn produce(
        &self,
        _request: &ValueRequest<'_>,
        ctx: &mut GenerationContext<'_>,
        _walker: &GraphWalker,
    ) -> Result<FixtureValue, GenerationError> {
        Ok(FixtureValue::Uuid(uuid_v4(ctx.rng())))
    }
}

/// Generate a UUID v4 from the given engine so seeded runs reproduce it.
pub fn uuid_v4<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let bytes: [u8; 16] = rng.random();
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}
