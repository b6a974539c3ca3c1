//! String and character strategies.
//!
//! Text resolution order: a size violation wins, then pattern and email
//! violations, then pattern and email satisfaction, then plain text.

use super::{alphanumeric, size_outside, size_within, ValueRequest, ValueStrategy};
use crate::context::GenerationContext;
use crate::directive::{Polarity, SizeBounds};
use crate::error::{GenerationError, UnsupportedReason};
use crate::generators::pattern::CompiledPattern;
use crate::capability::Capability;
use crate::interpreter::default_size;
use crate::walker::GraphWalker;
use fixture_core::FixtureValue;
use rand::distr::Alphanumeric;
use rand::Rng;

const TLDS: [&str; 5] = ["com", "org", "net", "io", "dev"];

/// Shortest address this generator produces: `a@b.io`.
const MIN_EMAIL_LEN: usize = 6;

const SYMBOLS: &[u8] = b"!#$%&*+-./:;<=>?@[]^_{|}~ ";

/// Strings, including pattern and email formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextStrategy;

/// Single characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharStrategy;

impl ValueStrategy for TextStrategy {
    fn produce(
        &self,
        request: &ValueRequest<'_>,
        ctx: &mut GenerationContext<'_>,
        _walker: &GraphWalker,
    ) -> Result<FixtureValue, GenerationError> {
        let directive = request.directive;
        let (config, rng) = ctx.config_and_rng();
        let retry_limit = config.retry_limit;
        let size = directive.size.map(|t| t.bounds);
        let bounds = size.unwrap_or_else(|| default_size(Capability::Text, config));

        if let Some(target) = directive.size.filter(|t| t.is_outside()) {
            return match size_outside(rng, target.bounds) {
                Some(len) => Ok(FixtureValue::String(alphanumeric(rng, len))),
                None => Err(exhausted(ctx, request, retry_limit)),
            };
        }

        if let Some(target) = directive.pattern.as_ref().filter(|t| t.polarity == Polarity::Outside) {
            return match pattern_outside(rng, &target.pattern, bounds, retry_limit) {
                Some(value) => Ok(FixtureValue::String(value)),
                None => Err(exhausted(ctx, request, retry_limit)),
            };
        }

        if directive.email == Some(Polarity::Outside) {
            let len = size_within(rng, bounds).max(1);
            return Ok(FixtureValue::String(alphanumeric(rng, len)));
        }

        if let Some(target) = &directive.pattern {
            return match pattern_within(rng, &target.pattern, bounds, retry_limit) {
                Some(value) => Ok(FixtureValue::String(value)),
                None => {
                    tracing::warn!(
                        field = %ctx.field_path(),
                        pattern = target.pattern.source(),
                        attempts = retry_limit,
                        "no matching string found"
                    );
                    Err(ctx.unsupported(
                        request.field_type,
                        UnsupportedReason::PatternUnsatisfied {
                            attempts: retry_limit,
                        },
                    ))
                }
            };
        }

        if directive.email == Some(Polarity::Within) {
            if bounds.max < MIN_EMAIL_LEN {
                tracing::warn!(
                    field = %ctx.field_path(),
                    max = bounds.max,
                    minimum = MIN_EMAIL_LEN,
                    "size constraint too short for an email address; following the email format"
                );
            }
            return Ok(FixtureValue::String(email(ctx.rng(), bounds)));
        }

        let len = size_within(rng, bounds);
        Ok(FixtureValue::String(alphanumeric(rng, len)))
    }
}

fn exhausted(ctx: &GenerationContext<'_>, request: &ValueRequest<'_>, attempts: u32) -> GenerationError {
    tracing::warn!(field = %ctx.field_path(), attempts, "no violating string found");
    ctx.unsupported(request.field_type, UnsupportedReason::RetryExhausted { attempts })
}

/// Matching string, preferring lengths inside `bounds`.
///
/// A match of any length is returned when none fits the bounds.
pub fn pattern_within<R: Rng + ?Sized>(
    rng: &mut R,
    pattern: &CompiledPattern,
    bounds: SizeBounds,
    retry_limit: u32,
) -> Option<String> {
    let mut fallback = None;
    for _ in 0..retry_limit.max(1) {
        let candidate = pattern.sample(rng);
        if !pattern.is_match(&candidate) {
            continue;
        }
        if bounds.contains(candidate.chars().count()) {
            return Some(candidate);
        }
        fallback.get_or_insert(candidate);
    }
    fallback
}

/// String the pattern rejects.
///
/// Cycles through random text, symbol runs and a corrupted match.
pub fn pattern_outside<R: Rng + ?Sized>(
    rng: &mut R,
    pattern: &CompiledPattern,
    bounds: SizeBounds,
    retry_limit: u32,
) -> Option<String> {
    for attempt in 0..retry_limit.max(1) {
        let len = size_within(rng, bounds).max(1);
        let candidate = match attempt % 3 {
            0 => alphanumeric(rng, len),
            1 => {
                (0..len)
                    .map(|_| char::from(SYMBOLS[rng.random_range(0..SYMBOLS.len())]))
                    .collect()
            }
            _ => {
                let mut sample = pattern.sample(rng);
                let at = rng.random_range(0..=sample.len());
                let at = (0..=at).rev().find(|i| sample.is_char_boundary(*i)).unwrap_or(0);
                sample.insert(at, '#');
                sample
            }
        };
        if !pattern.is_match(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Address of the form `local@domain.tld` with a length inside `bounds`.
pub fn email<R: Rng + ?Sized>(rng: &mut R, bounds: SizeBounds) -> String {
    let bounds = SizeBounds {
        min: bounds.min.max(MIN_EMAIL_LEN),
        max: bounds.max.max(MIN_EMAIL_LEN),
    };
    let len = size_within(rng, bounds);

    let fitting: Vec<&str> = TLDS.iter().copied().filter(|t| t.len() + 4 <= len).collect();
    let tld = fitting
        .get(rng.random_range(0..fitting.len().max(1)))
        .copied()
        .unwrap_or("io");

    // '@' and '.' take two characters
    let remaining = len.saturating_sub(tld.len() + 2).max(2);
    let domain_len = rng.random_range(1..remaining);
    let local_len = remaining - domain_len;

    let local = alphanumeric(rng, local_len).to_lowercase();
    let domain = alphanumeric(rng, domain_len).to_lowercase();
    format!("{local}@{domain}.{tld}")
}

impl ValueStrategy for CharStrategy {
    fn produce(
        &self,
        _request: &ValueRequest<'_>,
        ctx: &mut GenerationContext<'_>,
        _walker: &GraphWalker,
    ) -> Result<FixtureValue, GenerationError> {
        Ok(FixtureValue::Char(char::from(ctx.rng().sample(Alphanumeric))))
    }
}
