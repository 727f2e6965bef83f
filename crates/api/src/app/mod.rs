//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store backend selection, schema bootstrap, seeding
//! - `routes/`: HTTP handlers (generic CRUD plus actuator endpoints)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, build_services};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(build_services(config).await?);
    Ok(router(config, services))
}

/// Assemble routes and layers around already-built services.
pub fn router(config: &AppConfig, services: Arc<AppServices>) -> Router {
    let jwt = Arc::new(taproom_auth::Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require a valid bearer token.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .merge(routes::actuator())
        .merge(protected)
        .layer(ServiceBuilder::new().layer(taproom_observability::trace_layer()))
}
