use thiserror::Error;

use crate::{Action, PolicyDecision, PolicyEngine, Principal, ResourceContext, ResourceKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: {action} on {kind} is not allowed")]
    Forbidden { action: Action, kind: ResourceKind },

    #[error("forbidden: missing scope '{0}'")]
    MissingScope(String),

    /// The caller asked about a scope name that is not registered.
    #[error("forbidden: unknown scope '{0}'")]
    InvalidScope(String),
}

/// Authorize an action, turning a Deny into an error for `?`-style callers.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(
    engine: &PolicyEngine,
    principal: &Principal,
    action: Action,
    context: &ResourceContext,
) -> Result<PolicyDecision, AuthzError> {
    let decision = engine.decide(principal, action, context);
    if decision.allowed {
        Ok(decision)
    } else {
        tracing::info!(
            principal_id = %principal.id(),
            action = %action,
            resource_kind = %context.resource_kind,
            target_id = context.target_id,
            "authorization denied"
        );
        Err(AuthzError::Forbidden {
            action,
            kind: context.resource_kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecisionReason, RoleTier, Scope};
    use marketplace_core::UserId;

    #[test]
    fn allow_passes_the_decision_through() {
        let engine = PolicyEngine::default();
        let p = Principal::new(UserId::new(1), RoleTier::Admin, [Scope::PATCH_ROLE]);
        let decision = authorize(&engine, &p, Action::PatchRole, &ResourceContext::user(UserId::new(2))).unwrap();
        assert_eq!(decision.reason, DecisionReason::ScopeGranted);
    }

    #[test]
    fn deny_becomes_forbidden() {
        let engine = PolicyEngine::default();
        let p = Principal::new(UserId::new(1), RoleTier::Admin, []);
        let err = authorize(&engine, &p, Action::PatchRole, &ResourceContext::user(UserId::new(2))).unwrap_err();
        assert_eq!(
            err,
            AuthzError::Forbidden {
                action: Action::PatchRole,
                kind: ResourceKind::User
            }
        );
        assert_eq!(err.to_string(), "forbidden: patch_role on user is not allowed");
    }
}
