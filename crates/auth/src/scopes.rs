use std::borrow::{Borrow, Cow};
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AuthzError, Principal};

/// Token scope identifier (e.g. `"patch-role"`).
///
/// Scopes are granted when a token is issued and travel inside it; they are
/// independent of the account's role tier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(Cow<'static, str>);

impl Scope {
    /// Create sub categories.
    pub const CREATE_SUB: Scope = Scope(Cow::Borrowed("create-sub"));
    /// Change another user's role tier.
    pub const PATCH_ROLE: Scope = Scope(Cow::Borrowed("patch-role"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Scope {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scope membership checks, decoupled from any routing mechanism.
///
/// The gate knows which scope names exist. Asking about a name outside that
/// registry is a configuration mistake on the caller's side; it is logged and
/// answered with "no" rather than treated as fatal.
#[derive(Debug, Clone)]
pub struct ScopeGate {
    known: BTreeMap<Scope, &'static str>,
}

impl ScopeGate {
    /// Gate with an explicit registry of `(scope, description)` pairs.
    pub fn new(known: impl IntoIterator<Item = (Scope, &'static str)>) -> Self {
        Self {
            known: known.into_iter().collect(),
        }
    }

    /// The marketplace's scopes: `create-sub` and `patch-role`.
    pub fn standard() -> Self {
        Self::new([
            (Scope::CREATE_SUB, "Create Sub Categories"),
            (Scope::PATCH_ROLE, "Change User Role"),
        ])
    }

    /// `true` iff `required` is a known scope and the principal was granted it.
    pub fn has(&self, principal: &Principal, required: &str) -> bool {
        self.check(principal, required).is_ok()
    }

    /// Like [`has`](Self::has) but says why a check failed.
    pub fn check(&self, principal: &Principal, required: &str) -> Result<(), AuthzError> {
        if !self.known.contains_key(required) {
            tracing::warn!(scope = required, "scope check against unregistered scope");
            return Err(AuthzError::InvalidScope(required.to_string()));
        }
        if principal.holds_scope(required) {
            Ok(())
        } else {
            Err(AuthzError::MissingScope(required.to_string()))
        }
    }
}

impl Default for ScopeGate {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoleTier;
    use marketplace_core::UserId;

    fn principal(scopes: &[&'static str]) -> Principal {
        Principal::new(
            UserId::new(1),
            RoleTier::Member,
            scopes.iter().map(|s| Scope::new(*s)),
        )
    }

    #[test]
    fn granted_scope_is_present() {
        let gate = ScopeGate::standard();
        assert!(gate.has(&principal(&["create-sub"]), "create-sub"));
    }

    #[test]
    fn missing_scope_is_absent() {
        let gate = ScopeGate::standard();
        let p = principal(&["create-sub"]);
        assert!(!gate.has(&p, "patch-role"));
        assert_eq!(
            gate.check(&p, "patch-role"),
            Err(AuthzError::MissingScope("patch-role".to_string()))
        );
    }

    #[test]
    fn unknown_scope_is_denied_even_if_granted() {
        let gate = ScopeGate::standard();
        let p = principal(&["delete-everything"]);
        assert!(!gate.has(&p, "delete-everything"));
        assert_eq!(
            gate.check(&p, "delete-everything"),
            Err(AuthzError::InvalidScope("delete-everything".to_string()))
        );
    }

    #[test]
    fn role_tier_does_not_imply_scopes() {
        let gate = ScopeGate::standard();
        let admin = Principal::new(UserId::new(1), RoleTier::Super, []);
        assert!(!gate.has(&admin, "patch-role"));
        assert!(!gate.has(&admin, "create-sub"));
    }

    #[test]
    fn standard_registry_knows_both_scopes() {
        let gate = ScopeGate::default();
        let nobody = Principal::new(UserId::new(1), RoleTier::Member, []);
        for scope in [Scope::CREATE_SUB, Scope::PATCH_ROLE] {
            assert!(matches!(gate.check(&nobody, scope.as_str()), Err(AuthzError::MissingScope(_))));
        }
    }
}
