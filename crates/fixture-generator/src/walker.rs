//! Cycle-safe traversal of the type graph.

use crate::capability::{self, CapabilityRegistry};
use crate::context::{GenerationContext, InjectType};
use crate::directive::{ConstraintDirective, Presence};
use crate::error::{GenerationError, UnsupportedReason};
use crate::generators::ValueRequest;
use crate::interpreter::ConstraintInterpreter;
use fixture_core::{
    Constraint, FieldDescriptor, FixtureObject, FixtureType, FixtureValue, GenerationConfig,
    TypeRegistry,
};
use rand::Rng;

/// Drives generation for one type graph.
///
/// The walker itself is stateless between calls; all per-call state lives
/// in a [`GenerationContext`], so one walker can serve many threads.
#[derive(Debug, Default)]
pub struct GraphWalker {
    capabilities: CapabilityRegistry,
    interpreter: ConstraintInterpreter,
}

impl GraphWalker {
    /// Create a walker with the built-in strategy table.
    pub fn new() -> Self {
        Self::with_capabilities(CapabilityRegistry::standard())
    }

    /// Create a walker with a custom strategy table.
    pub fn with_capabilities(capabilities: CapabilityRegistry) -> Self {
        Self {
            capabilities,
            interpreter: ConstraintInterpreter::new(),
        }
    }

    /// Generate one value of `ty` in `mode`.
    ///
    /// The root object is always populated regardless of depth limits.
    pub fn generate(
        &self,
        registry: &TypeRegistry,
        ty: &FixtureType,
        mode: InjectType,
        config: GenerationConfig,
    ) -> Result<FixtureValue, GenerationError> {
        config.validate()?;
        let mut ctx = GenerationContext::new(registry, mode, config);
        tracing::debug!(%ty, %mode, "generating fixture");
        match ty {
            FixtureType::Object { name } => self.walk_object(name, &mut ctx),
            other => self.generate_element(other, &mut ctx),
        }
    }

    /// Populate every field of a registered object type in declaration order.
    pub fn walk_object(
        &self,
        type_name: &str,
        ctx: &mut GenerationContext<'_>,
    ) -> Result<FixtureValue, GenerationError> {
        let Some(descriptor) = ctx.registry().get(type_name) else {
            return Err(ctx.unsupported(
                &FixtureType::object(type_name),
                UnsupportedReason::Unregistered,
            ));
        };

        ctx.enter_type(type_name);
        let mut object = FixtureObject::new(type_name);
        for field in &descriptor.fields {
            ctx.enter_field(&field.name);
            let scoped = !field.overrides.is_empty();
            let value = if scoped {
                match ctx.push_overrides(&field.overrides) {
                    Ok(()) => {
                        let value = self.field_value(field, ctx);
                        ctx.pop_overrides();
                        value
                    }
                    Err(source) => {
                        tracing::warn!(field = %ctx.field_path(), error = %source, "rejecting field overrides");
                        Err(GenerationError::Config(source))
                    }
                }
            } else {
                self.field_value(field, ctx)
            };
            ctx.exit_field();
            match value {
                Ok(value) => object.push(field.name.clone(), value),
                Err(err) => {
                    ctx.exit_type();
                    return Err(err);
                }
            }
        }
        ctx.exit_type();
        Ok(FixtureValue::Object(object))
    }

    /// Generate a container element or other unconstrained slot.
    pub fn generate_element(
        &self,
        ty: &FixtureType,
        ctx: &mut GenerationContext<'_>,
    ) -> Result<FixtureValue, GenerationError> {
        if self.is_cut(ty, ctx) {
            return Ok(FixtureValue::Null);
        }
        let directive = ConstraintDirective::unconstrained();
        self.produce(ty, &directive, false, ctx)
    }

    /// Check if `ty` is an object reference the guard stops at here.
    pub fn is_cut(&self, ty: &FixtureType, ctx: &GenerationContext<'_>) -> bool {
        ty.object_name().is_some_and(|name| ctx.should_cut(name))
    }

    fn field_value(
        &self,
        field: &FieldDescriptor,
        ctx: &mut GenerationContext<'_>,
    ) -> Result<FixtureValue, GenerationError> {
        if self.is_cut(&field.field_type, ctx) {
            tracing::trace!(field = %ctx.field_path(), "cycle or depth limit reached; leaving null");
            return Ok(FixtureValue::Null);
        }

        let capability = capability::resolve(&field.field_type, ctx.registry())
            .map_err(|reason| ctx.unsupported(&field.field_type, reason))?;

        let mode = ctx.mode();
        let (config, rng) = ctx.config_and_rng();
        let directive = self
            .interpreter
            .directive(field, capability, mode, config, rng)
            .map_err(|source| GenerationError::InvalidPattern {
                field: ctx.field_path(),
                pattern: field
                    .constraints
                    .iter()
                    .find_map(|c| match c {
                        Constraint::Pattern { regexp } => Some(regexp.clone()),
                        _ => None,
                    })
                    .unwrap_or_default(),
                source,
            })?;

        match directive.presence {
            Presence::Null => return Ok(FixtureValue::Null),
            Presence::Optional => {
                let (config, rng) = ctx.config_and_rng();
                if config.null_probability > 0.0 && rng.random_bool(config.null_probability) {
                    return Ok(FixtureValue::Null);
                }
            }
            Presence::Required => {}
        }

        self.produce(&field.field_type, &directive, field.nullable, ctx)
    }

    fn produce(
        &self,
        ty: &FixtureType,
        directive: &ConstraintDirective,
        nullable: bool,
        ctx: &mut GenerationContext<'_>,
    ) -> Result<FixtureValue, GenerationError> {
        let capability = capability::resolve(ty, ctx.registry())
            .map_err(|reason| ctx.unsupported(ty, reason))?;
        let strategy = self
            .capabilities
            .lookup(ctx.mode(), capability)
            .ok_or_else(|| {
                ctx.unsupported(ty, UnsupportedReason::MissingStrategy(capability.to_string()))
            })?;
        let request = ValueRequest {
            field_type: ty,
            directive,
            nullable,
        };
        strategy.produce(&request, ctx, self)
    }
}
