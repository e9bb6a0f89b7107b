//! `marketplace-auth`: pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: callers hand it
//! a resolved [`Principal`] and [`ResourceContext`] and get a
//! [`PolicyDecision`] back.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod policy;
pub mod principal;
pub mod roles;
pub mod scopes;
pub mod user;

pub use authorize::{AuthzError, authorize};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use policy::{Action, DecisionReason, PolicyDecision, PolicyEngine, ResourceContext, ResourceKind};
pub use principal::Principal;
pub use roles::{RoleTier, UnknownRoleTier};
pub use scopes::{Scope, ScopeGate};
pub use user::{RoleChanged, User};
