//! User accounts.
//!
//! Accounts carry the role tier used to build a [`Principal`]. The tier is read
//! on every request, so a change applies to tokens already issued.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marketplace_core::{DomainError, Entity, UserId};

use crate::{Principal, RoleTier};

/// A marketplace user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: RoleTier,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful role change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleChanged {
    pub user_id: UserId,
    pub from: RoleTier,
    pub to: RoleTier,
    pub changed_by: UserId,
}

impl User {
    /// Validate and build an account. Email is normalized to lowercase.
    pub fn new(
        id: UserId,
        name: &str,
        email: &str,
        role: RoleTier,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(Self {
            id,
            name: name.trim().to_string(),
            email: email.to_lowercase(),
            role,
            created_at,
        })
    }

    /// Set the account's tier on behalf of `actor`. The caller has already
    /// been cleared by the policy engine for `PatchRole`.
    pub fn change_role(&mut self, actor: &Principal, to: RoleTier) -> RoleChanged {
        let from = self.role;
        self.role = to;

        RoleChanged {
            user_id: self.id,
            from,
            to,
            changed_by: actor.id(),
        }
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scope;

    fn user(role: RoleTier) -> User {
        User::new(UserId::new(20), "Bob", "Bob@Example.com", role, Utc::now()).unwrap()
    }

    fn admin() -> Principal {
        Principal::new(UserId::new(1), RoleTier::Admin, [Scope::PATCH_ROLE])
    }

    #[test]
    fn new_user_normalizes_email() {
        let u = user(RoleTier::Member);
        assert_eq!(u.email, "bob@example.com");
        assert_eq!(u.role, RoleTier::Member);
    }

    #[test]
    fn new_user_rejects_invalid_email() {
        let err = User::new(UserId::new(1), "Alice", "invalid-email", RoleTier::Member, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_user_rejects_blank_name() {
        assert!(User::new(UserId::new(1), "  ", "a@b.c", RoleTier::Member, Utc::now()).is_err());
    }

    #[test]
    fn admin_promotes_member_to_admin() {
        let mut u = user(RoleTier::Member);

        let changed = u.change_role(&admin(), RoleTier::Admin);
        assert_eq!(changed.from, RoleTier::Member);
        assert_eq!(changed.to, RoleTier::Admin);
        assert_eq!(changed.changed_by, UserId::new(1));
        assert_eq!(u.role, RoleTier::Admin);
    }

    #[test]
    fn admin_can_grant_super() {
        let mut u = user(RoleTier::Member);

        let changed = u.change_role(&admin(), RoleTier::Super);
        assert_eq!(changed.to, RoleTier::Super);
        assert_eq!(u.role, RoleTier::Super);
    }

    #[test]
    fn demotion_records_previous_tier() {
        let mut u = user(RoleTier::Super);

        let changed = u.change_role(&admin(), RoleTier::Member);
        assert_eq!(changed.from, RoleTier::Super);
        assert_eq!(u.role, RoleTier::Member);
    }
}
