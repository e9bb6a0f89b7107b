use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

use marketplace_auth::{JwtValidator, Principal, User};
use marketplace_infra::Store;

use crate::app::errors::ApiError;
use crate::context::{PrincipalContext, RequestId};
use crate::throttle::RateLimiter;

pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
    pub users: Arc<dyn Store<User>>,
}

/// Wrap every request in an `http.request` span with a correlation id.
///
/// A valid UUID in an incoming `x-request-id` is reused; otherwise a v7 id is
/// generated. The id is echoed on the response.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::now_v7);

    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
        principal_id = tracing::field::Empty,
    );
    req.extensions_mut().insert(RequestId(request_id));

    let start = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        let status = response.status();
        let elapsed_ms = start.elapsed().as_millis() as u64;
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), elapsed_ms, "request failed");
        } else {
            tracing::info!(status = status.as_u16(), elapsed_ms, "request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

/// Verify the bearer token and resolve the caller's account.
///
/// The role tier comes from the account (so role changes apply to live
/// tokens), scopes from the token. Unknown accounts are rejected.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| {
        tracing::info!(error = %e, "rejected bearer token");
        ApiError::from(e)
    })?;

    let user = state.users.get(&claims.sub).ok_or_else(|| {
        tracing::info!(sub = %claims.sub, "token subject has no account");
        ApiError::Unauthorized("unknown user".to_string())
    })?;

    let principal = Principal::new(user.id, user.role, claims.scopes);
    tracing::Span::current().record("principal_id", user.id.get());

    req.extensions_mut()
        .insert(PrincipalContext::new(principal, user.name, claims.expires_at));

    Ok(next.run(req).await)
}

/// Fixed-window throttle keyed by principal. Must run after `auth_middleware`.
pub async fn throttle_middleware(State(limiter): State<Arc<RateLimiter>>, req: Request, next: Next) -> Response {
    let Some(principal_id) = req.extensions().get::<PrincipalContext>().map(|c| c.principal().id()) else {
        return ApiError::Unauthorized("missing principal".to_string()).into_response();
    };

    match limiter.check(principal_id, Instant::now()) {
        Ok(_) => next.run(req).await,
        Err(retry_after) => {
            tracing::info!(%principal_id, "request throttled");
            ApiError::TooManyRequests {
                retry_after_secs: retry_after.as_secs().max(1),
            }
            .into_response()
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let missing = || ApiError::Unauthorized("missing bearer token".to_string());

    let header = headers.get(axum::http::header::AUTHORIZATION).ok_or_else(missing)?;
    let header = header.to_str().map_err(|_| missing())?;
    let token = header.strip_prefix("Bearer ").ok_or_else(missing)?.trim();
    if token.is_empty() {
        return Err(missing());
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn rejects_other_schemes_and_blank_tokens() {
        assert!(extract_bearer(&headers("Basic abc")).is_err());
        assert!(extract_bearer(&headers("Bearer   ")).is_err());
        assert!(extract_bearer(&HeaderMap::new()).is_err());
    }
}
