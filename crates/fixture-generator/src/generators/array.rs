//! Collection and map strategies.
//!
//! Element counts come from the field's size bounds, or from the configured
//! collection size range when none are declared. Elements are generated
//! through the walker with unconstrained directives.

use super::{size_outside, size_within, ValueRequest, ValueStrategy};
use crate::capability::Capability;
use crate::context::GenerationContext;
use crate::directive::SizeBounds;
use crate::error::{GenerationError, UnsupportedReason};
use crate::interpreter::default_size;
use crate::walker::GraphWalker;
use fixture_core::{FixtureType, FixtureValue};
use std::collections::HashSet;

/// Lists, sets and arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionStrategy;

/// Maps with unique keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapStrategy;

/// Element count drawn for a container, with the bounds it was drawn against.
#[derive(Debug, Clone, Copy)]
struct ElementCount {
    wanted: usize,
    bounds: SizeBounds,
    outside: bool,
}

impl ElementCount {
    /// Check if a container of `len` elements still honors the request.
    fn accepts(&self, len: usize) -> bool {
        self.bounds.contains(len) != self.outside
    }
}

/// Element count for a container request.
fn element_count(
    request: &ValueRequest<'_>,
    ctx: &mut GenerationContext<'_>,
) -> Result<ElementCount, GenerationError> {
    let (config, rng) = ctx.config_and_rng();
    let retry_limit = config.retry_limit;
    match request.directive.size {
        Some(target) if target.is_outside() => match size_outside(rng, target.bounds) {
            Some(wanted) => Ok(ElementCount {
                wanted,
                bounds: target.bounds,
                outside: true,
            }),
            None => {
                tracing::warn!(field = %ctx.field_path(), "size covers every count; no violating count exists");
                Err(ctx.unsupported(
                    request.field_type,
                    UnsupportedReason::RetryExhausted {
                        attempts: retry_limit,
                    },
                ))
            }
        },
        Some(target) => Ok(ElementCount {
            wanted: size_within(rng, target.bounds),
            bounds: target.bounds,
            outside: false,
        }),
        None => {
            let bounds = default_size(Capability::Collection, config);
            Ok(ElementCount {
                wanted: size_within(rng, bounds),
                bounds,
                outside: false,
            })
        }
    }
}

/// Fail when deduplication left fewer elements than the size bounds allow.
fn check_distinct(
    request: &ValueRequest<'_>,
    ctx: &GenerationContext<'_>,
    count: ElementCount,
    produced: usize,
    attempts: usize,
) -> Result<(), GenerationError> {
    if count.accepts(produced) {
        return Ok(());
    }
    tracing::warn!(
        field = %ctx.field_path(),
        wanted = count.wanted,
        produced,
        "not enough distinct elements to honor the size bounds"
    );
    Err(ctx.unsupported(
        request.field_type,
        UnsupportedReason::RetryExhausted {
            attempts: u32::try_from(attempts).unwrap_or(u32::MAX),
        },
    ))
}

impl ValueStrategy for CollectionStrategy {
    fn produce(
        &self,
        request: &ValueRequest<'_>,
        ctx: &mut GenerationContext<'_>,
        walker: &GraphWalker,
    ) -> Result<FixtureValue, GenerationError> {
        let (element, unique) = match request.field_type {
            FixtureType::List { element } | FixtureType::Array { element } => (element.as_ref(), false),
            FixtureType::Set { element } => (element.as_ref(), true),
            other => {
                return Err(ctx.unsupported(
                    other,
                    UnsupportedReason::MissingStrategy(Capability::Collection.to_string()),
                ))
            }
        };

        if walker.is_cut(element, ctx) {
            tracing::trace!(field = %ctx.field_path(), %element, "element type is cut; generating empty collection");
            return Ok(FixtureValue::Array(Vec::new()));
        }

        let count = element_count(request, ctx)?;
        let mut items = Vec::with_capacity(count.wanted);

        if !unique {
            for _ in 0..count.wanted {
                items.push(walker.generate_element(element, ctx)?);
            }
            return Ok(FixtureValue::Array(items));
        }

        let mut seen = HashSet::new();
        let max_attempts = count.wanted.saturating_add(ctx.config().retry_limit as usize);
        let mut attempts = 0;
        while items.len() < count.wanted && attempts < max_attempts {
            attempts += 1;
            let item = walker.generate_element(element, ctx)?;
            if seen.insert(item.key_string()) {
                items.push(item);
            }
        }
        check_distinct(request, ctx, count, items.len(), attempts)?;
        Ok(FixtureValue::Array(items))
    }
}

impl ValueStrategy for MapStrategy {
    fn produce(
        &self,
        request: &ValueRequest<'_>,
        ctx: &mut GenerationContext<'_>,
        walker: &GraphWalker,
    ) -> Result<FixtureValue, GenerationError> {
        let FixtureType::Map { key, value } = request.field_type else {
            return Err(ctx.unsupported(
                request.field_type,
                UnsupportedReason::MissingStrategy(Capability::Map.to_string()),
            ));
        };

        if walker.is_cut(key, ctx) || walker.is_cut(value, ctx) {
            return Ok(FixtureValue::Map(Vec::new()));
        }

        let count = element_count(request, ctx)?;
        let mut entries = Vec::with_capacity(count.wanted);
        let mut seen = HashSet::new();
        let max_attempts = count.wanted.saturating_add(ctx.config().retry_limit as usize);
        let mut attempts = 0;
        while entries.len() < count.wanted && attempts < max_attempts {
            attempts += 1;
            let k = walker.generate_element(key, ctx)?;
            if !seen.insert(k.key_string()) {
                continue;
            }
            let v = walker.generate_element(value, ctx)?;
            entries.push((k, v));
        }
        check_distinct(request, ctx, count, entries.len(), attempts)?;
        Ok(FixtureValue::Map(entries))
    }
}
