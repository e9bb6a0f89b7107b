use chrono::{DateTime, Utc};
use uuid::Uuid;

use marketplace_auth::Principal;

/// Correlation id of the current request (also sent back as `x-request-id`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

/// Authenticated caller for a request.
///
/// Immutable for the request's lifetime; built by the auth middleware from the
/// verified token and the caller's account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
    name: String,
    expires_at: DateTime<Utc>,
}

impl PrincipalContext {
    pub fn new(principal: Principal, name: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            principal,
            name: name.into(),
            expires_at,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}
