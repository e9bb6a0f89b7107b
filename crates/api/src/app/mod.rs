//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store lookups and writes behind the handlers
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and query helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use marketplace_auth::Hs256JwtValidator;

use crate::config::ApiConfig;
use crate::middleware;
use crate::throttle::RateLimiter;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(config: &ApiConfig, services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        jwt: Arc::new(Hs256JwtValidator::new(config.jwt_secret.as_bytes())),
        users: services.repos.users.clone(),
    };
    let limiter = Arc::new(RateLimiter::new(config.throttle_max_requests, config.throttle_window));

    // Layers run bottom-up: auth, then throttle, then the handler.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(limiter, middleware::throttle_middleware))
        .layer(axum::middleware::from_fn_with_state(auth_state, middleware::auth_middleware));

    routes::public_router()
        .merge(protected)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_id_middleware)))
}
