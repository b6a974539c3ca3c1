//! Zero values for default-value mode.

use super::{ValueRequest, ValueStrategy};
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::walker::GraphWalker;
use chrono::{DateTime, Utc};
use fixture_core::{FixtureType, FixtureValue};
use uuid::Uuid;

/// Type's zero value; empty strings become null on nullable fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroValueStrategy;

impl ValueStrategy for ZeroValueStrategy {
    fn produce(
        &self,
        request: &ValueRequest<'_>,
        _ctx: &mut GenerationContext<'_>,
        _walker: &GraphWalker,
    ) -> Result<FixtureValue, GenerationError> {
        Ok(zero_value(request.field_type, request.nullable))
    }
}

/// Zero value of a type.
pub fn zero_value(ty: &FixtureType, nullable: bool) -> FixtureValue {
    match ty {
        FixtureType::Bool => FixtureValue::Bool(false),
        FixtureType::Int8 | FixtureType::Int16 | FixtureType::Int32 | FixtureType::Int64 => {
            FixtureValue::Int(0)
        }
        FixtureType::Float32 | FixtureType::Float64 => FixtureValue::Float(0.0),
        FixtureType::Char => FixtureValue::Char('\0'),
        FixtureType::String if nullable => FixtureValue::Null,
        FixtureType::String => FixtureValue::String(String::new()),
        FixtureType::Uuid => FixtureValue::Uuid(Uuid::nil()),
        FixtureType::DateTime => FixtureValue::DateTime(DateTime::<Utc>::default()),
        FixtureType::Array { .. } | FixtureType::List { .. } | FixtureType::Set { .. } => {
            FixtureValue::Array(Vec::new())
        }
        FixtureType::Map { .. } => FixtureValue::Map(Vec::new()),
        FixtureType::Enum { .. } | FixtureType::Object { .. } | FixtureType::Opaque { .. } => {
            FixtureValue::Null
        }
    }
}
