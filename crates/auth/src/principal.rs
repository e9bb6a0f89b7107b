use std::collections::BTreeSet;

use serde::Serialize;

use marketplace_core::UserId;

use crate::{RoleTier, Scope};

/// A fully resolved principal for authorization decisions.
///
/// Built once per request by the authentication layer (identity and tier from
/// the account, scopes from the presented token) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    id: UserId,
    role_tier: RoleTier,
    granted_scopes: BTreeSet<Scope>,
}

impl Principal {
    pub fn new(id: UserId, role_tier: RoleTier, granted_scopes: impl IntoIterator<Item = Scope>) -> Self {
        Self {
            id,
            role_tier,
            granted_scopes: granted_scopes.into_iter().collect(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn role_tier(&self) -> RoleTier {
        self.role_tier
    }

    pub fn granted_scopes(&self) -> &BTreeSet<Scope> {
        &self.granted_scopes
    }

    pub(crate) fn holds_scope(&self, scope: &str) -> bool {
        self.granted_scopes.contains(scope)
    }
}
