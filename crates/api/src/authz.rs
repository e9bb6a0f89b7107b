//! API-side authorization guard.
//!
//! Handlers resolve the target first (so a missing resource is a 404), then
//! call into here before touching any state.

use marketplace_auth::{Action, PolicyDecision, PolicyEngine, ResourceContext, authorize};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

/// Require the policy engine to allow `action` on `resource`.
pub fn require(
    engine: &PolicyEngine,
    ctx: &PrincipalContext,
    action: Action,
    resource: &ResourceContext,
) -> Result<PolicyDecision, ApiError> {
    Ok(authorize(engine, ctx.principal(), action, resource)?)
}

/// Require a registered scope on the caller's token, independent of role.
pub fn require_scope(engine: &PolicyEngine, ctx: &PrincipalContext, scope: &str) -> Result<(), ApiError> {
    Ok(engine.scope_gate().check(ctx.principal(), scope)?)
}
