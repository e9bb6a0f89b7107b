//! Marketplace HTTP API: server wiring, middleware, routing and request/response mapping.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
pub mod throttle;

pub use app::build_app;
pub use app::services::AppServices;
pub use config::ApiConfig;
