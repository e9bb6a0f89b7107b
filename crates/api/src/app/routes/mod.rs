use axum::{Router, routing::get};

pub mod categories;
pub mod common;
pub mod products;
pub mod public;
pub mod rates;
pub mod system;
pub mod users;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/", get(public::banner))
        .route("/inspire", get(public::inspire))
        .route("/health", get(system::health))
}

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/category", categories::router())
        .nest("/product", products::router().merge(rates::router()))
        .nest("/user", users::router())
}
