use axum::{Json, http::StatusCode, http::Uri, response::Response};
use serde_json::{Value, json};

use crate::app::errors;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}

pub async fn info() -> Json<Value> {
    Json(json!({
        "app": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}

pub async fn no_route(uri: Uri) -> Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", format!("no route for {}", uri.path()))
}
