use axum::{routing::get, Router};

use taproom_catalog::{Beer, Customer};

pub mod resource;
pub mod system;

/// Router for all authenticated endpoints.
///
/// Carries the fallback so unmatched paths are also behind authentication.
pub fn router() -> Router {
    Router::new()
        .merge(resource::router::<Beer>())
        .merge(resource::router::<Customer>())
        .fallback(system::no_route)
}

/// Actuator endpoints; reachable without a token.
pub fn actuator() -> Router {
    Router::new()
        .route("/actuator/health", get(system::health))
        .route("/actuator/info", get(system::info))
}
