//! Central access-control rule table.
//!
//! Every "may this principal do X to Y" question in the marketplace goes
//! through [`PolicyEngine::decide`]. Rules, first match wins:
//!
//! | # | action | condition | outcome |
//! |---|--------|-----------|---------|
//! | 1 | `ViewList`, `ViewAny` | member | Deny |
//! | 2 | `ViewOwn` | owner | Allow (`OwnerMatch`) |
//! | 3 | `ViewOwn`, `ViewAny`, `ViewList` | admin / super | Allow (`RoleSufficient`) |
//! | 4 | `Create` | product or rate | Allow (`RoleSufficient`) |
//! | 5 | `Update`, `Delete` | product or rate, owner | Allow (`OwnerMatch`) |
//! | 6 | `PatchRole` | admin / super **and** `patch-role` scope | Allow (`ScopeGranted`) |
//! | 7 | anything else | | Deny |

use serde::{Deserialize, Serialize};

use marketplace_core::UserId;

use crate::{Principal, Scope, ScopeGate};

/// Operation being gated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ViewList,
    ViewOwn,
    ViewAny,
    Create,
    Update,
    Delete,
    PatchRole,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::ViewList,
        Action::ViewOwn,
        Action::ViewAny,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::PatchRole,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::ViewList => "view_list",
            Action::ViewOwn => "view_own",
            Action::ViewAny => "view_any",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::PatchRole => "patch_role",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of resource an action targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Product,
    User,
    Order,
    Rate,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Product,
        ResourceKind::User,
        ResourceKind::Order,
        ResourceKind::Rate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Product => "product",
            ResourceKind::User => "user",
            ResourceKind::Order => "order",
            ResourceKind::Rate => "rate",
        }
    }
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of an action, resolved by the data layer before the policy runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceContext {
    pub resource_kind: ResourceKind,
    pub owner_id: UserId,
    pub target_id: u64,
}

impl ResourceContext {
    pub fn new(resource_kind: ResourceKind, owner_id: UserId, target_id: u64) -> Self {
        Self {
            resource_kind,
            owner_id,
            target_id,
        }
    }

    pub fn product(owner_id: UserId, product_id: u64) -> Self {
        Self::new(ResourceKind::Product, owner_id, product_id)
    }

    /// A user account owns itself.
    pub fn user(user_id: UserId) -> Self {
        Self::new(ResourceKind::User, user_id, user_id.get())
    }

    pub fn order(owner_id: UserId, order_id: u64) -> Self {
        Self::new(ResourceKind::Order, owner_id, order_id)
    }

    pub fn rate(owner_id: UserId, rate_id: u64) -> Self {
        Self::new(ResourceKind::Rate, owner_id, rate_id)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    OwnerMatch,
    RoleSufficient,
    ScopeGranted,
    Denied,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDecision {
    pub allowed: bool,
    pub reason: DecisionReason,
}

impl PolicyDecision {
    pub fn allow(reason: DecisionReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    pub fn deny() -> Self {
        Self {
            allowed: false,
            reason: DecisionReason::Denied,
        }
    }
}

/// Stateless decision function over (principal, action, resource).
#[derive(Debug, Clone, Default)]
pub struct PolicyEngine {
    scopes: ScopeGate,
}

impl PolicyEngine {
    pub fn new(scopes: ScopeGate) -> Self {
        Self { scopes }
    }

    pub fn scope_gate(&self) -> &ScopeGate {
        &self.scopes
    }

    /// Decide whether `principal` may perform `action` on `context`.
    ///
    /// - No IO
    /// - No panics
    /// - Deny is an ordinary return value
    pub fn decide(&self, principal: &Principal, action: Action, context: &ResourceContext) -> PolicyDecision {
        let decision = self.evaluate(principal, action, context);
        tracing::debug!(
            principal_id = %principal.id(),
            role = %principal.role_tier(),
            action = %action,
            resource_kind = %context.resource_kind,
            target_id = context.target_id,
            allowed = decision.allowed,
            reason = ?decision.reason,
            "policy decision"
        );
        decision
    }

    fn evaluate(&self, principal: &Principal, action: Action, context: &ResourceContext) -> PolicyDecision {
        let staff = principal.role_tier().is_staff();
        let owns = context.owner_id == principal.id();

        match action {
            // Listing everything and viewing arbitrary records is staff-only.
            Action::ViewList | Action::ViewAny => {
                if staff {
                    PolicyDecision::allow(DecisionReason::RoleSufficient)
                } else {
                    PolicyDecision::deny()
                }
            }
            Action::ViewOwn => {
                if owns {
                    PolicyDecision::allow(DecisionReason::OwnerMatch)
                } else if staff {
                    PolicyDecision::allow(DecisionReason::RoleSufficient)
                } else {
                    PolicyDecision::deny()
                }
            }
            Action::Create => match context.resource_kind {
                ResourceKind::Product | ResourceKind::Rate => {
                    PolicyDecision::allow(DecisionReason::RoleSufficient)
                }
                ResourceKind::User | ResourceKind::Order => PolicyDecision::deny(),
            },
            Action::Update | Action::Delete => match context.resource_kind {
                ResourceKind::Product | ResourceKind::Rate if owns => {
                    PolicyDecision::allow(DecisionReason::OwnerMatch)
                }
                _ => PolicyDecision::deny(),
            },
            // Role alone never suffices here.
            Action::PatchRole => {
                if staff && self.scopes.has(principal, Scope::PATCH_ROLE.as_str()) {
                    PolicyDecision::allow(DecisionReason::ScopeGranted)
                } else {
                    PolicyDecision::deny()
                }
            }
        }
    }
}
